// src/dungeon/src/path.rs

//! A* pursuit paths over the 4-connected grid.
//!
//! Edge cost is 1 and the heuristic is Manhattan distance. The open list is
//! scanned linearly and only a strictly smaller f-score replaces the current
//! best, so ties resolve to the node inserted first. Enemy movement depends on
//! that order being reproduced exactly.

use std::collections::{HashMap, HashSet};

use crate::coord::Coord;
use crate::grid::Grid;

/// Shortest path from `start` to `goal`, excluding `start` and ending on
/// `goal`.
///
/// Intermediate cells must be passable and unoccupied. The goal itself only
/// needs to be passable, since the pursued entity is standing on it.
/// `start == goal` yields an empty path; an unreachable goal yields `None`.
pub fn find_path(grid: &Grid, start: Coord, goal: Coord) -> Option<Vec<Coord>> {
    let mut open: Vec<Coord> = vec![start];
    let mut closed: HashSet<Coord> = HashSet::new();
    let mut came_from: HashMap<Coord, Coord> = HashMap::new();
    let mut g_score: HashMap<Coord, i32> = HashMap::new();
    let mut f_score: HashMap<Coord, i32> = HashMap::new();

    g_score.insert(start, 0);
    f_score.insert(start, start.manhattan(goal));

    while !open.is_empty() {
        let mut best = 0;
        for i in 1..open.len() {
            if f_score[&open[i]] < f_score[&open[best]] {
                best = i;
            }
        }
        let current = open.remove(best);

        if current == goal {
            return Some(reconstruct(&came_from, current));
        }

        closed.insert(current);

        for neighbor in current.neighbors() {
            if closed.contains(&neighbor) || !is_traversable(grid, neighbor, goal) {
                continue;
            }

            let tentative = g_score[&current] + 1;
            let in_open = open.contains(&neighbor);
            if !in_open || tentative < g_score[&neighbor] {
                came_from.insert(neighbor, current);
                g_score.insert(neighbor, tentative);
                f_score.insert(neighbor, tentative + neighbor.manhattan(goal));
                if !in_open {
                    open.push(neighbor);
                }
            }
        }
    }

    None
}

fn is_traversable(grid: &Grid, coord: Coord, goal: Coord) -> bool {
    if coord == goal {
        grid.is_passable(coord)
    } else {
        grid.is_walkable(coord)
    }
}

fn reconstruct(came_from: &HashMap<Coord, Coord>, mut current: Coord) -> Vec<Coord> {
    let mut path = vec![current];
    while let Some(prev) = came_from.get(&current) {
        current = *prev;
        path.push(current);
    }
    // the walk ends on the start cell, which is not part of the path
    path.pop();
    path.reverse();
    path
}
