//! Human-readable byte formatting.

/// Unit scaling options for [`pretty_bytes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteFormat {
    /// Base-1000 units (`KB`) when true, base-1024 units (`KiB`) otherwise.
    pub metric: bool,
    /// Prefix positive values with `+`.
    pub sign: bool,
    /// Decimal places to round to.
    pub precision: u32,
}

impl ByteFormat {
    /// Base-1000 scaling, no sign, one decimal place.
    pub const METRIC: Self = Self {
        metric: true,
        sign: false,
        precision: 1,
    };

    /// Base-1024 scaling, no sign, one decimal place.
    pub const BINARY: Self = Self {
        metric: false,
        sign: false,
        precision: 1,
    };
}

impl Default for ByteFormat {
    fn default() -> Self {
        Self::METRIC
    }
}

const METRIC_UNITS: [&str; 9] = ["", "K", "M", "G", "T", "P", "E", "Z", "Y"];
const BINARY_UNITS: [&str; 9] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "Zi", "Yi"];

/// Format a byte count as a short human-readable string, e.g. `"1.5 GB"`.
///
/// Scales into the largest unit whose rounded value stays below the base and
/// stops once the unit table is exhausted, even if the magnitude would
/// warrant further scaling. A non-integral or non-finite `size` yields an
/// empty string: callers hand over whole byte counts, and anything else is
/// surfaced as a blank display value rather than a panic.
pub fn pretty_bytes(size: f64, format: ByteFormat) -> String {
    if !size.is_finite() || size.fract() != 0.0 {
        return String::new();
    }

    let (power, units) = if format.metric {
        (1000.0, &METRIC_UNITS)
    } else {
        (1024.0, &BINARY_UNITS)
    };

    let prefix = if format.sign && size > 0.0 { "+" } else { "" };

    let mut scaled = size;
    let mut unit = 0usize;
    while round_to(scaled, format.precision).abs() >= power && unit + 1 < units.len() {
        scaled /= power;
        unit += 1;
    }

    if unit == 0 {
        // Unscaled values are whole byte counts.
        format!("{prefix}{size} B")
    } else {
        let rounded = round_to(scaled, format.precision);
        format!("{prefix}{} {}B", trim_fraction(rounded, format.precision), units[unit])
    }
}

fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

/// Render with at most `precision` decimals, trimming trailing zeros but
/// keeping at least one fractional digit.
fn trim_fraction(value: f64, precision: u32) -> String {
    let decimals = precision.max(1) as usize;
    let mut text = format!("{value:.decimals$}");
    if let Some(dot) = text.find('.') {
        let min_len = dot + 2;
        while text.len() > min_len && text.ends_with('0') {
            text.pop();
        }
    }
    text
}

/// Order human-formatted sizes by unit class, then by numeric value.
///
/// Entries keep their original text. Assumes each entry is already in its
/// largest sensible unit; entries whose suffix is not one of
/// `B`/`KB`/`MB`/`GB`/`TB` (or whose value does not parse) are dropped.
pub fn sort_sizes<S: AsRef<str>>(sizes: &[S]) -> Vec<String> {
    let mut ordered = Vec::with_capacity(sizes.len());

    for suffix in [" B", " KB", " MB", " GB", " TB"] {
        let mut class: Vec<(f64, &str)> = sizes
            .iter()
            .map(AsRef::as_ref)
            .filter_map(|size| {
                let value = size.strip_suffix(suffix)?;
                if !value.ends_with(|c: char| c.is_ascii_digit()) {
                    return None;
                }
                value.parse::<f64>().ok().map(|parsed| (parsed, size))
            })
            .collect();
        class.sort_by(|a, b| a.0.total_cmp(&b.0));
        ordered.extend(class.into_iter().map(|(_, size)| size.to_owned()));

        // Every entry placed, skip the remaining classes.
        if ordered.len() == sizes.len() {
            break;
        }
    }

    ordered
}
