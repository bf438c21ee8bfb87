use goldspin_types::BetResult;
use serde::Serialize;
use std::fmt;

/// Running totals over settled spins.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Stats {
    pub trials: u64,
    pub wagered: u64,
    pub returned: u64,
    /// Spins with at least one winning line.
    pub hits: u64,
    /// Golden cells converted into jokers.
    pub conversions: u64,
    pub multiplier_sum: u64,
    #[serde(skip)]
    total_net: f64,
    #[serde(skip)]
    total_net_sq: f64,
}

impl Stats {
    pub fn add(&mut self, bet: u64, result: &BetResult) {
        let net = result.win_amount as f64 - bet as f64;
        self.trials += 1;
        self.wagered = self.wagered.saturating_add(bet);
        self.returned = self.returned.saturating_add(result.win_amount);
        if !result.winning_lines.is_empty() {
            self.hits += 1;
        }
        // Generated grids never contain jokers, so every joker came from a conversion.
        self.conversions += result.grid.joker_count() as u64;
        self.multiplier_sum += u64::from(result.multiplier);
        self.total_net += net;
        self.total_net_sq += net * net;
    }

    pub fn merge(&mut self, other: &Stats) {
        self.trials += other.trials;
        self.wagered = self.wagered.saturating_add(other.wagered);
        self.returned = self.returned.saturating_add(other.returned);
        self.hits += other.hits;
        self.conversions += other.conversions;
        self.multiplier_sum += other.multiplier_sum;
        self.total_net += other.total_net;
        self.total_net_sq += other.total_net_sq;
    }

    fn per_trial(&self, value: f64) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            value / self.trials as f64
        }
    }

    /// Return to player: total returned over total wagered.
    pub fn rtp(&self) -> f64 {
        if self.wagered == 0 {
            0.0
        } else {
            self.returned as f64 / self.wagered as f64
        }
    }

    pub fn hit_rate(&self) -> f64 {
        self.per_trial(self.hits as f64)
    }

    pub fn mean_multiplier(&self) -> f64 {
        self.per_trial(self.multiplier_sum as f64)
    }

    pub fn mean_net(&self) -> f64 {
        self.per_trial(self.total_net)
    }

    /// Standard error of the RTP estimate.
    pub fn stderr(&self) -> f64 {
        if self.trials <= 1 {
            return 0.0;
        }
        let mean = self.mean_net();
        let var = (self.total_net_sq / self.trials as f64) - mean * mean;
        let var = if var < 0.0 { 0.0 } else { var };
        let mean_wagered = self.per_trial(self.wagered as f64);
        if mean_wagered == 0.0 {
            return 0.0;
        }
        (var / self.trials as f64).sqrt() / mean_wagered
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "spins:           {}", self.trials)?;
        writeln!(f, "wagered:         {}", self.wagered)?;
        writeln!(f, "returned:        {}", self.returned)?;
        writeln!(
            f,
            "rtp:             {:.4} (±{:.4})",
            self.rtp(),
            self.stderr()
        )?;
        writeln!(f, "hit rate:        {:.4}", self.hit_rate())?;
        writeln!(f, "mean multiplier: {:.3}", self.mean_multiplier())?;
        write!(f, "conversions:     {}", self.conversions)
    }
}
