use std::{str::FromStr, time::Duration};

use serde::Serialize;

use crate::{error::ParseError, general::ResourceKind};

const MB: u64 = 1024 * 1024;

/// Limits and timing of simulated attachment uploads.
#[derive(Debug, Clone, clap::Args)]
pub struct UploadConfig {
    #[arg(
        long,
        env = "FIGURES_TEXT_MAX_FILES",
        default_value_t = 5,
        help = "Maximum number of text resources per character"
    )]
    pub text_max_files: usize,

    #[arg(
        long,
        env = "FIGURES_TEXT_MAX_SIZE_MB",
        default_value_t = 10,
        help = "Maximum size of one text resource in MB"
    )]
    pub text_max_size_mb: u64,

    #[arg(
        long,
        env = "FIGURES_AUDIO_MAX_FILES",
        default_value_t = 3,
        help = "Maximum number of audio resources per character"
    )]
    pub audio_max_files: usize,

    #[arg(
        long,
        env = "FIGURES_AUDIO_MAX_SIZE_MB",
        default_value_t = 50,
        help = "Maximum size of one audio resource in MB"
    )]
    pub audio_max_size_mb: u64,

    #[arg(
        long,
        env = "FIGURES_UPLOAD_DURATION",
        default_value = "2s",
        help = "How long a simulated upload takes, human friendly format (e.g. 2s, 500ms)",
        value_parser = humantime::parse_duration
    )]
    pub upload_duration: Duration,

    #[arg(
        long,
        env = "FIGURES_UPLOAD_TICK",
        default_value = "200ms",
        help = "Interval of simulated upload progress updates",
        value_parser = humantime::parse_duration
    )]
    pub upload_tick: Duration,

    #[arg(
        long,
        env = "FIGURES_DRAFT_TTL",
        default_value = "30m",
        help = "Idle time after which an unsubmitted form draft is dropped, human friendly format (e.g. 30m, 1h)",
        value_parser = humantime::parse_duration
    )]
    pub draft_ttl: Duration,
}

impl Default for UploadConfig {
    fn default() -> Self {
        UploadConfig {
            text_max_files: 5,
            text_max_size_mb: 10,
            audio_max_files: 3,
            audio_max_size_mb: 50,
            upload_duration: Duration::from_secs(2),
            upload_tick: Duration::from_millis(200),
            draft_ttl: Duration::from_secs(30 * 60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPolicy {
    pub max_files: usize,
    pub max_size: u64,
}

impl UploadConfig {
    pub fn policy(&self, kind: ResourceKind) -> UploadPolicy {
        match kind {
            ResourceKind::Text => UploadPolicy {
                max_files: self.text_max_files,
                max_size: self.text_max_size_mb * MB,
            },
            ResourceKind::Audio => UploadPolicy {
                max_files: self.audio_max_files,
                max_size: self.audio_max_size_mb * MB,
            },
        }
    }
}

/// One 100-year band, `start` is a multiple of 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CenturyBand {
    pub start: i32,
}

impl CenturyBand {
    /// Ordinal century number, the band 900–999 is the 10th century.
    pub fn century(&self) -> i32 {
        self.start.div_euclid(100) + 1
    }

    pub fn end(&self) -> i32 {
        self.start + 99
    }

    pub fn contains(&self, year: i32) -> bool {
        year >= self.start && year <= self.end()
    }

    pub fn key(&self) -> String {
        format!("century{}", self.century())
    }
}

/// Upper bound of bands in one table.
pub const MAX_BANDS: usize = 100;

/// Ordered table of century bands used for birth-year bucketing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CenturyBands(Vec<CenturyBand>);

impl CenturyBands {
    /// `count` contiguous bands, the first one starting at `first_start`.
    pub fn contiguous(first_start: i32, count: usize) -> Result<Self, ParseError> {
        if first_start.rem_euclid(100) != 0 {
            return Err(ParseError::InvalidBands(format!(
                "band must start at a multiple of 100, got {first_start}"
            )));
        }
        if count > MAX_BANDS {
            return Err(ParseError::InvalidBands(format!(
                "{count} bands requested, at most {MAX_BANDS} allowed"
            )));
        }
        // last year of the last band must fit into i32
        let last_year = i32::try_from(count)
            .ok()
            .and_then(|c| c.checked_mul(100))
            .and_then(|span| first_start.checked_add(span))
            .and_then(|end| end.checked_sub(1));
        if last_year.is_none() {
            return Err(ParseError::InvalidBands(format!(
                "bands from {first_start} overflow the year range"
            )));
        }
        let bands = (0..count as i32)
            .map(|i| CenturyBand {
                start: first_start + i * 100,
            })
            .collect();
        Ok(CenturyBands(bands))
    }

    pub fn bands(&self) -> &[CenturyBand] {
        &self.0
    }

    /// Position of the band containing `year`
    pub fn position(&self, year: i32) -> Option<usize> {
        self.0.iter().position(|b| b.contains(year))
    }
}

impl Default for CenturyBands {
    fn default() -> Self {
        CenturyBands((9..14).map(|c| CenturyBand { start: c * 100 }).collect())
    }
}

/// Parses comma separated inclusive year ranges, like `900-1399` or `900-1099,1300-1399`.
impl FromStr for CenturyBands {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bands: Vec<CenturyBand> = Vec::new();
        for range in s.split(',') {
            let range = range.trim();
            let (start, end) = range
                .split_once("..")
                .or_else(|| range.rsplit_once('-').filter(|(s, _)| !s.is_empty()))
                .ok_or_else(|| ParseError::InvalidBands(format!("not a range: {range}")))?;
            let start: i32 = start
                .trim()
                .parse()
                .map_err(|_| ParseError::InvalidBands(format!("invalid start in {range}")))?;
            let end: i32 = end
                .trim()
                .parse()
                .map_err(|_| ParseError::InvalidBands(format!("invalid end in {range}")))?;
            let whole = |end_excl: i32| {
                start.rem_euclid(100) == 0 && end_excl.rem_euclid(100) == 0 && end_excl > start
            };
            let Some(end_excl) = end.checked_add(1).filter(|e| whole(*e)) else {
                return Err(ParseError::InvalidBands(format!(
                    "range {range} is not made of whole centuries"
                )));
            };
            let count = (i64::from(end_excl) - i64::from(start)) / 100;
            if count as usize + bands.len() > MAX_BANDS {
                return Err(ParseError::InvalidBands(format!(
                    "range {range} has too many bands, at most {MAX_BANDS} allowed"
                )));
            }
            let count = count as usize;
            for band in CenturyBands::contiguous(start, count)?.0 {
                if bands.iter().any(|b| b.start == band.start) {
                    return Err(ParseError::InvalidBands(format!(
                        "overlapping band starting at {}",
                        band.start
                    )));
                }
                bands.push(band);
            }
        }
        if bands.is_empty() {
            return Err(ParseError::InvalidBands("no bands".to_string()));
        }
        Ok(CenturyBands(bands))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bands() {
        let bands = CenturyBands::default();
        assert_eq!(bands.bands().len(), 5);
        assert_eq!(bands.bands()[0].century(), 10);
        assert_eq!(bands.bands()[4].key(), "century14");
        assert_eq!(bands.position(999), Some(0));
        assert_eq!(bands.position(1000), Some(1));
        assert_eq!(bands.position(1399), Some(4));
        assert_eq!(bands.position(1400), None);
        assert_eq!(bands.position(899), None);
    }

    #[test]
    fn test_parse_bands() {
        let bands: CenturyBands = "900-1399".parse().unwrap();
        assert_eq!(bands, CenturyBands::default());

        let bands: CenturyBands = "900..999, 1300-1499".parse().unwrap();
        let starts: Vec<i32> = bands.bands().iter().map(|b| b.start).collect();
        assert_eq!(starts, vec![900, 1300, 1400]);
    }

    #[test]
    fn test_parse_bands_invalid() {
        assert!("950-1399".parse::<CenturyBands>().is_err());
        assert!("900-1350".parse::<CenturyBands>().is_err());
        assert!("900-999,900-1099".parse::<CenturyBands>().is_err());
        assert!("garbage".parse::<CenturyBands>().is_err());
    }

    #[test]
    fn test_parse_bands_limits() {
        assert!("0-2147483647".parse::<CenturyBands>().is_err());
        assert!("-2147483600-0".parse::<CenturyBands>().is_err());
        assert_eq!("0-9999".parse::<CenturyBands>().unwrap().bands().len(), MAX_BANDS);
        assert!("0-10099".parse::<CenturyBands>().is_err());
        assert!("0-5099,6000-11099".parse::<CenturyBands>().is_err());
        assert!(CenturyBands::contiguous(2_147_483_500, 2).is_err());
        assert!(CenturyBands::contiguous(900, MAX_BANDS + 1).is_err());
    }

    #[test]
    fn test_upload_policy() {
        let config = UploadConfig::default();
        assert_eq!(config.policy(ResourceKind::Text).max_files, 5);
        assert_eq!(config.policy(ResourceKind::Audio).max_size, 50 * MB);
    }
}
