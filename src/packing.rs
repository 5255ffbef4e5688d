// TurboTap64 - Turbo-loading C64 cassette images from crunched PRG files
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Distribution of programs over cassette sides.
//!
//! Uses best-fit-decreasing: longest programs first, each into the side
//! it fills most tightly.

/// Assignment of items to bins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packing {
    /// Number of bins opened.
    pub bins: usize,
    /// Bin index of each item, in input order.
    pub assignment: Vec<usize>,
}

impl Packing {
    /// Input indices of the items in `bin`, in input order.
    pub fn items_in(&self, bin: usize) -> Vec<usize> {
        self.assignment
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b == bin)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Pack `durations` into bins of `capacity` seconds.
///
/// Equal durations are placed in input order, and among equally tight bins
/// the first one wins. An item longer than `capacity` gets a bin of its own.
pub fn best_fit_decreasing(durations: &[f64], capacity: f64) -> Packing {
    let mut order: Vec<usize> = (0..durations.len()).collect();
    // Stable, so ties keep their input order
    order.sort_by(|&a, &b| durations[b].total_cmp(&durations[a]));

    let mut remaining: Vec<f64> = Vec::new();
    let mut assignment = vec![0; durations.len()];

    for index in order {
        let duration = durations[index];

        let mut best: Option<(usize, f64)> = None;
        for (bin, &space) in remaining.iter().enumerate() {
            let left = space - duration;
            if left >= 0.0 && best.map_or(true, |(_, tightest)| left < tightest) {
                best = Some((bin, left));
            }
        }

        assignment[index] = match best {
            Some((bin, left)) => {
                remaining[bin] = left;
                bin
            }
            None => {
                remaining.push(capacity - duration);
                remaining.len() - 1
            }
        };
    }

    Packing {
        bins: remaining.len(),
        assignment,
    }
}

/// Capacity of one cassette side in seconds, for a tape of `minutes`.
pub fn side_capacity(minutes: u32) -> f64 {
    (u64::from(minutes / 2) * 60) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_best_fit_prefers_tightest_bin() {
        let packing = best_fit_decreasing(&[70.0, 60.0, 50.0, 40.0], 100.0);
        assert_eq!(packing.bins, 3);
        assert_eq!(packing.assignment, vec![0, 1, 2, 1]);
        assert_eq!(packing.items_in(1), vec![1, 3]);
    }

    #[test]
    fn test_empty_input() {
        let packing = best_fit_decreasing(&[], 100.0);
        assert_eq!(packing.bins, 0);
        assert!(packing.assignment.is_empty());
    }

    #[test]
    fn test_ties_keep_input_order() {
        // Both fit into the first bin only one at a time
        let packing = best_fit_decreasing(&[60.0, 60.0], 100.0);
        assert_eq!(packing.assignment, vec![0, 1]);
    }

    #[test]
    fn test_equal_remainders_pick_first_bin() {
        let packing = best_fit_decreasing(&[80.0, 80.0, 10.0], 100.0);
        assert_eq!(packing.assignment, vec![0, 1, 0]);
    }

    #[test]
    fn test_oversized_item_gets_own_bin() {
        let packing = best_fit_decreasing(&[150.0, 20.0], 100.0);
        assert_eq!(packing.bins, 2);
        assert_eq!(packing.assignment, vec![0, 1]);
    }

    #[test]
    fn test_exact_fit() {
        let packing = best_fit_decreasing(&[50.0, 50.0], 100.0);
        assert_eq!(packing.bins, 1);
    }

    #[test_case(90, 2700.0; "c90")]
    #[test_case(60, 1800.0; "c60")]
    #[test_case(45, 1320.0; "odd length rounds down")]
    #[test_case(1, 0.0; "too short")]
    fn test_side_capacity(minutes: u32, expected: f64) {
        assert_eq!(side_capacity(minutes), expected);
    }
}
