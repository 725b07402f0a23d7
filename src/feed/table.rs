/// One observation of the price feed.
///
/// All fields are kept as the feed spells them; the price still carries the
/// provider's decimal comma.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRow {
    /// `tarifario` column
    pub tariff: String,
    /// `opcao` column
    pub option: String,
    /// `dia` column, `dd/mm/yyyy`
    pub day: String,
    /// `intervalo` column, e.g. `[07:00-07:15[`
    pub interval: String,
    /// Price column, e.g. `0,12345`
    pub price: String,
}

impl FeedRow {
    /// Whether the interval label starts in the given hour of the day
    pub fn starts_in_hour(&self, hour: u32) -> bool {
        self.interval.starts_with(&format!("[{:02}:", hour))
    }
}

/// Rows of one parsed feed, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceTable {
    rows: Vec<FeedRow>,
}

impl PriceTable {
    pub fn new(rows: Vec<FeedRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[FeedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FeedRow> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a PriceTable {
    type Item = &'a FeedRow;
    type IntoIter = std::slice::Iter<'a, FeedRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(interval: &str) -> FeedRow {
        FeedRow {
            tariff: "X".into(),
            option: "Y".into(),
            day: "01/01/2024".into(),
            interval: interval.into(),
            price: "0,1".into(),
        }
    }

    #[test]
    fn hour_prefix_is_zero_padded() {
        assert!(row("[07:00-07:15[").starts_in_hour(7));
        assert!(!row("[07:00-07:15[").starts_in_hour(17));
        assert!(row("[17:45-18:00[").starts_in_hour(17));
        assert!(!row("7:00-7:15").starts_in_hour(7));
    }

    #[test]
    fn table_preserves_file_order() {
        let table = PriceTable::new(vec![row("[01:00-01:15["), row("[00:00-00:15[")]);
        let intervals: Vec<_> = table.iter().map(|r| r.interval.as_str()).collect();
        assert_eq!(intervals, vec!["[01:00-01:15[", "[00:00-00:15["]);
        assert_eq!(table.len(), 2);
    }
}
