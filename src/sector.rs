// src/sector.rs

use std::collections::{BTreeMap, HashMap};

/// Label written for symbols the provider returned no sector for.
pub const UNCLASSIFIED: &str = "None";

#[derive(Clone, Debug, PartialEq)]
pub struct SectorShare {
    pub sector: String,
    pub count: usize,
    pub fraction: f64,
    pub symbols: Vec<String>,
}

impl SectorShare {
    pub fn percentage(&self) -> String {
        format!("{:.2}", self.fraction)
    }
}

/// Sector shares ranked by descending count, ties broken by sector name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SectorSummary {
    pub shares: Vec<SectorShare>,
}

impl SectorSummary {
    /// Builds the summary over the symbols that both survived the price table
    /// and have a sector entry. Everything else is left out of the total.
    pub fn from_survivors(survivors: &[String], sectors: &HashMap<String, Option<String>>) -> Self {
        let mut members: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for symbol in survivors {
            if let Some(sector) = sectors.get(symbol) {
                let label = sector.clone().unwrap_or_else(|| UNCLASSIFIED.to_string());
                members.entry(label).or_default().push(symbol.clone());
            }
        }

        let total: usize = members.values().map(Vec::len).sum();
        let mut shares: Vec<SectorShare> = members
            .into_iter()
            .map(|(sector, symbols)| SectorShare {
                count: symbols.len(),
                fraction: symbols.len() as f64 / total as f64,
                sector,
                symbols,
            })
            .collect();

        // Ties rank by sector name: the stable sort keeps the BTreeMap order.
        shares.sort_by(|a, b| b.count.cmp(&a.count));
        SectorSummary { shares }
    }

    pub fn total(&self) -> usize {
        self.shares.iter().map(|s| s.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// (sector, two-decimal percentage) rows as persisted.
    pub fn rows(&self) -> Vec<(String, String)> {
        self.shares.iter().map(|s| (s.sector.clone(), s.percentage())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sectors(entries: &[(&str, Option<&str>)]) -> HashMap<String, Option<String>> {
        entries
            .iter()
            .map(|(symbol, sector)| (symbol.to_string(), sector.map(str::to_string)))
            .collect()
    }

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn only_surviving_symbols_are_counted() {
        let labels = sectors(&[("A", Some("Tech")), ("B", Some("Tech")), ("C", Some("Health"))]);
        let summary = SectorSummary::from_survivors(&symbols(&["A", "C"]), &labels);

        assert_eq!(
            summary.rows(),
            vec![("Health".to_string(), "0.50".to_string()), ("Tech".to_string(), "0.50".to_string())]
        );
        assert_eq!(summary.total(), 2);
    }

    #[test]
    fn ranked_by_descending_count() {
        let labels = sectors(&[
            ("A", Some("Energy")),
            ("B", Some("Tech")),
            ("C", Some("Tech")),
            ("D", Some("Tech")),
        ]);
        let summary = SectorSummary::from_survivors(&symbols(&["A", "B", "C", "D"]), &labels);

        assert_eq!(summary.shares[0].sector, "Tech");
        assert_eq!(summary.shares[0].percentage(), "0.75");
        assert_eq!(summary.shares[0].symbols, symbols(&["B", "C", "D"]));
        assert_eq!(summary.shares[1].sector, "Energy");
        assert_eq!(summary.shares[1].percentage(), "0.25");
    }

    #[test]
    fn missing_sector_is_its_own_category() {
        let labels = sectors(&[("A", None), ("B", Some("Tech"))]);
        let summary = SectorSummary::from_survivors(&symbols(&["A", "B"]), &labels);

        assert!(summary.shares.iter().any(|s| s.sector == UNCLASSIFIED && s.count == 1));
    }

    #[test]
    fn survivor_without_sector_entry_is_excluded() {
        let labels = sectors(&[("A", Some("Tech"))]);
        let summary = SectorSummary::from_survivors(&symbols(&["A", "Z"]), &labels);

        assert_eq!(summary.total(), 1);
        assert_eq!(summary.rows(), vec![("Tech".to_string(), "1.00".to_string())]);
    }

    #[test]
    fn fractions_sum_to_one_within_rounding() {
        let labels = sectors(&[
            ("A", Some("Tech")),
            ("B", Some("Health")),
            ("C", Some("Energy")),
            ("D", Some("Tech")),
            ("E", Some("Utilities")),
            ("F", None),
            ("G", Some("Health")),
        ]);
        let survivors = symbols(&["A", "B", "C", "D", "E", "F", "G"]);
        let summary = SectorSummary::from_survivors(&survivors, &labels);

        let exact: f64 = summary.shares.iter().map(|s| s.fraction).sum();
        assert!((exact - 1.0).abs() < 1e-9);

        let rounded: f64 = summary.rows().iter().map(|(_, p)| p.parse::<f64>().unwrap()).sum();
        assert!((rounded - 1.0).abs() <= 0.01 * summary.shares.len() as f64);
    }

    #[test]
    fn empty_intersection_gives_empty_summary() {
        let labels = sectors(&[("A", Some("Tech"))]);
        let summary = SectorSummary::from_survivors(&symbols(&["B"]), &labels);
        assert!(summary.is_empty());
        assert!(summary.rows().is_empty());
    }
}
