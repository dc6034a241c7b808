pub mod attributes;
pub mod colors;
pub mod dataset;
pub mod join;
pub mod scale;
pub mod topology;

pub use attributes::Attribute;
pub use dataset::{KEY_FIELD, NAME_FIELD, RegionRow, parse_rows};
pub use join::{feature_key, feature_name, feature_value, join_attributes};
pub use scale::{LinearScale, NO_DATA_FILL, PALETTE, QuantileScale, extent};
