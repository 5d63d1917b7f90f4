use serde::{Deserialize, Serialize};

use crate::alignment::Alignment;

/// The three column-score variants produced by a single scoring pass; the
/// refiner picks one per its configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnScoreVariants {
    pub raw: f32,
    pub per_participant: f32,
    pub per_window_presence: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoringVariant {
    Raw,
    PerParticipant,
    PerWindowPresence,
}

impl ColumnScoreVariants {
    pub fn select(&self, variant: ScoringVariant) -> f32 {
        match variant {
            ScoringVariant::Raw => self.raw,
            ScoringVariant::PerParticipant => self.per_participant,
            ScoringVariant::PerWindowPresence => self.per_window_presence,
        }
    }
}

/// Linear triangular weight: peaks at distance 0 and falls to zero past
/// `radius`.
fn triangular_weight(distance: usize, radius: usize) -> f32 {
    if distance > radius {
        0.0
    } else {
        (radius + 1 - distance) as f32 / (radius + 1) as f32
    }
}

/// Scores every row of `alignment` using a triangular window of `radius`
/// columns on either side, from the per-cell scores already recorded on the
/// alignment (set by whatever upstream pairwise-scoring step produced it).
///
/// Each variant differs only in its normalisation denominator:
/// - `raw`: the windowed, weighted sum of present cell scores.
/// - `per_participant`: `raw` divided by the windowed, weighted count of
///   present entries (so columns with more participants are not favoured
///   purely by volume).
/// - `per_window_presence`: `raw` divided by the total window weight,
///   including positions beyond the alignment's ends, so edge columns are
///   not penalised relative to interior ones.
pub fn score_columns(alignment: &Alignment, radius: usize) -> Vec<ColumnScoreVariants> {
    let length = alignment.length();
    let mut out = Vec::with_capacity(length);

    for row in 0..length {
        let mut weighted_sum = 0.0f32;
        let mut participant_weight = 0.0f32;
        let mut window_weight_total = 0.0f32;

        for offset in 0..=radius {
            let weight = triangular_weight(offset, radius);
            let neighbours: Vec<usize> = if offset == 0 {
                vec![row]
            } else {
                let mut v = Vec::new();
                if row >= offset {
                    v.push(row - offset);
                }
                if row + offset < length {
                    v.push(row + offset);
                }
                v
            };

            for &r in &neighbours {
                window_weight_total += weight;
                let present = alignment.num_present_positions(r);
                participant_weight += weight * present as f32;
                for entry in alignment.iter_entries_present_at(r) {
                    if let Some(score) = alignment.score_of(entry, r) {
                        weighted_sum += weight * score;
                    }
                }
            }
        }

        out.push(ColumnScoreVariants {
            raw: weighted_sum,
            per_participant: if participant_weight > 0.0 { weighted_sum / participant_weight } else { 0.0 },
            per_window_presence: if window_weight_total > 0.0 { weighted_sum / window_weight_total } else { 0.0 },
        });
    }

    out
}
