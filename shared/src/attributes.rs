/// The fixed set of housing statistics the map and chart can display.
/// Variant order matches the CSV column order and the dropdown order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    TotalPopulation,
    OwnerOccupiedUnits,
    RenterOccupiedUnits,
    MedianMortgage,
    MedianRent,
}

impl Attribute {
    pub const ALL: [Attribute; 5] = [
        Attribute::TotalPopulation,
        Attribute::OwnerOccupiedUnits,
        Attribute::RenterOccupiedUnits,
        Attribute::MedianMortgage,
        Attribute::MedianRent,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// CSV column header, joined-property key, and display name in one string.
    pub fn label(self) -> &'static str {
        match self {
            Self::TotalPopulation => "Total Population",
            Self::OwnerOccupiedUnits => "Total Owner-Occupied Units",
            Self::RenterOccupiedUnits => "Total Renter-Occupied Units",
            Self::MedianMortgage => "Monthly Median Mortgage",
            Self::MedianRent => "Monthly Median Rent",
        }
    }

    /// Position in `ALL`, used to index per-row value arrays.
    pub fn index(self) -> usize {
        match self {
            Self::TotalPopulation => 0,
            Self::OwnerOccupiedUnits => 1,
            Self::RenterOccupiedUnits => 2,
            Self::MedianMortgage => 3,
            Self::MedianRent => 4,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|attr| attr.label() == label)
    }

    /// Attribute shown before the user makes any selection.
    pub fn default_selection() -> Self {
        Self::ALL[0]
    }
}

#[cfg(test)]
mod tests {
    use super::Attribute;

    #[test]
    fn index_matches_position_in_all() {
        for (i, attr) in Attribute::ALL.into_iter().enumerate() {
            assert_eq!(attr.index(), i);
        }
    }

    #[test]
    fn from_label_round_trips() {
        for attr in Attribute::ALL {
            assert_eq!(Attribute::from_label(attr.label()), Some(attr));
        }
        assert_eq!(Attribute::from_label("Select Attribute"), None);
    }

    #[test]
    fn default_selection_is_first() {
        assert_eq!(Attribute::default_selection(), Attribute::TotalPopulation);
    }
}
