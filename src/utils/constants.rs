/// Physical validity bounds per metric, in native units.
/// Values outside these ranges are treated as missing, not as errors.
pub const MIN_VALID_TEMP_F: f64 = -80.0;
pub const MAX_VALID_TEMP_F: f64 = 135.0;

pub const MIN_VALID_PRECIP_IN: f64 = 0.0;
pub const MAX_VALID_PRECIP_IN: f64 = 60.0;

pub const MIN_VALID_SNOW_IN: f64 = 0.0;
pub const MAX_VALID_SNOW_IN: f64 = 80.0;

pub const MIN_VALID_SNOW_DEPTH_IN: f64 = 0.0;
pub const MAX_VALID_SNOW_DEPTH_IN: f64 = 500.0;

pub const MIN_VALID_WIND_MPH: f64 = 0.0;
pub const MAX_VALID_WIND_MPH: f64 = 250.0;

pub const MIN_VALID_PCT: f64 = 0.0;
pub const MAX_VALID_PCT: f64 = 100.0;

pub const MIN_VALID_SOLAR_WM2: f64 = 0.0;
pub const MAX_VALID_SOLAR_WM2: f64 = 1500.0;

/// Unit conversion factors
pub const INCHES_TO_CM: f64 = 2.54;

/// Output defaults
pub const DEFAULT_TOP_K: usize = 10;
pub const DEFAULT_DECIMALS: u8 = 2;
