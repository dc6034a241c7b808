use crate::attributes::Attribute;

/// Identifier column shared by the CSV and the boundary properties.
/// Keys must match exactly; no normalization.
pub const KEY_FIELD: &str = "AFFGEOID";
/// Human-readable region name column.
pub const NAME_FIELD: &str = "NAME";

/// One parsed tabular record. `values` holds the numeric reading for each
/// attribute in `Attribute::ALL` order; unparsable or missing source text
/// is `None` and is treated as missing everywhere downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionRow {
    pub key: String,
    pub name: String,
    values: [Option<f64>; Attribute::COUNT],
}

impl RegionRow {
    pub fn new(key: impl Into<String>, name: impl Into<String>, values: [Option<f64>; Attribute::COUNT]) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            values,
        }
    }

    pub fn value(&self, attr: Attribute) -> Option<f64> {
        self.values[attr.index()]
    }
}

/// Parse one numeric cell. Anything that is not a finite number is missing.
fn parse_value(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse the tabular dataset from CSV text.
///
/// The key and name columns are required; attribute columns are looked up by
/// their display label and any absent column simply yields missing values,
/// mirroring how absent cells do.
pub fn parse_rows(text: &str) -> Result<Vec<RegionRow>, String> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers = reader
        .headers()
        .map_err(|e| format!("csv header error: {e}"))?
        .clone();

    let column = |field: &str| headers.iter().position(|h| h == field);
    let key_idx = column(KEY_FIELD).ok_or_else(|| format!("missing column {KEY_FIELD:?}"))?;
    let name_idx = column(NAME_FIELD).ok_or_else(|| format!("missing column {NAME_FIELD:?}"))?;
    let attr_idx: [Option<usize>; Attribute::COUNT] =
        Attribute::ALL.map(|attr| column(attr.label()));

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| format!("csv record error: {e}"))?;
        let field = |idx: usize| record.get(idx).unwrap_or_default();

        let mut values = [None; Attribute::COUNT];
        for (slot, idx) in values.iter_mut().zip(attr_idx) {
            *slot = idx.and_then(|i| parse_value(field(i)));
        }
        rows.push(RegionRow {
            key: field(key_idx).to_string(),
            name: field(name_idx).to_string(),
            values,
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
AFFGEOID,NAME,Total Population,Total Owner-Occupied Units,Total Renter-Occupied Units,Monthly Median Mortgage,Monthly Median Rent
0400000US55,Wisconsin,5893718,1360871,740184,1400,872
0400000US17,Illinois,12812508,3229945,1604688,1717,1038
0400000US27,Minnesota,5706494,1611246,624148,1601,
";

    #[test]
    fn parses_rows_with_all_attributes() {
        let rows = parse_rows(SAMPLE).unwrap();
        assert_eq!(rows.len(), 3);

        let wi = &rows[0];
        assert_eq!(wi.key, "0400000US55");
        assert_eq!(wi.name, "Wisconsin");
        assert_eq!(wi.value(Attribute::TotalPopulation), Some(5893718.0));
        assert_eq!(wi.value(Attribute::MedianRent), Some(872.0));
    }

    #[test]
    fn empty_cell_is_missing() {
        let rows = parse_rows(SAMPLE).unwrap();
        assert_eq!(rows[2].value(Attribute::MedianRent), None);
        assert_eq!(rows[2].value(Attribute::MedianMortgage), Some(1601.0));
    }

    #[test]
    fn malformed_cell_is_missing() {
        let text = "\
AFFGEOID,NAME,Total Population,Total Owner-Occupied Units,Total Renter-Occupied Units,Monthly Median Mortgage,Monthly Median Rent
0400000US02,Alaska,n/a,110134,63489,1906,1240
";
        let rows = parse_rows(text).unwrap();
        assert_eq!(rows[0].value(Attribute::TotalPopulation), None);
        assert_eq!(rows[0].value(Attribute::OwnerOccupiedUnits), Some(110134.0));
    }

    #[test]
    fn absent_attribute_column_yields_missing_values() {
        let text = "AFFGEOID,NAME,Total Population\n0400000US55,Wisconsin,5893718\n";
        let rows = parse_rows(text).unwrap();
        assert_eq!(rows[0].value(Attribute::TotalPopulation), Some(5893718.0));
        assert_eq!(rows[0].value(Attribute::MedianRent), None);
    }

    #[test]
    fn missing_key_column_is_an_error() {
        let text = "NAME,Total Population\nWisconsin,5893718\n";
        assert!(parse_rows(text).is_err());
    }

    #[test]
    fn quoted_names_keep_embedded_commas() {
        let text = "AFFGEOID,NAME,Total Population\nK1,\"Region, West\",12\n";
        let rows = parse_rows(text).unwrap();
        assert_eq!(rows[0].name, "Region, West");
    }
}
