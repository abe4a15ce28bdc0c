//! Wiring shared by every command: config, resolver, one-shot fetches

use anyhow::{Context, Result};
use noor_common::config::NoorConfig;
use noor_common::labels::Language;
use noor_common::location::{locate_from_config, LocationOutcome};
use noor_common::oracle::{SalahOracle, UmmAlQuraCalendar};
use noor_common::reflection::fetch_configured_reflection;
use noor_common::schedule::ScheduleResolver;
use noor_common::{GeoCoordinate, Reflection};

use crate::cli::GlobalArgs;

/// Load the config named on the command line, or the default search chain
pub fn load_config(args: &GlobalArgs) -> Result<NoorConfig> {
    let mut config = match &args.config {
        Some(path) => NoorConfig::load_from(path)?,
        None => NoorConfig::load()?,
    };
    apply_overrides(&mut config, args)?;
    Ok(config)
}

/// Command-line flags win over the file
pub fn apply_overrides(config: &mut NoorConfig, args: &GlobalArgs) -> Result<()> {
    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        GeoCoordinate::new(lat, lon).context("Invalid --lat/--lon")?;
        config.set_fixed_location(lat, lon);
    }
    if let Some(method) = &args.method {
        config.set_method(method)?;
    }
    if let Some(madhab) = &args.madhab {
        config.set_madhab(madhab)?;
    }
    if args.english {
        config.display.language = Language::English;
    }
    Ok(())
}

pub fn build_resolver(config: &NoorConfig) -> ScheduleResolver {
    ScheduleResolver::new(
        Box::new(SalahOracle),
        Box::new(UmmAlQuraCalendar::new(config.display.language)),
        config.calculation,
    )
}

/// One-shot location request off the async threads
pub async fn acquire_location(config: &NoorConfig) -> Result<LocationOutcome> {
    let location = config.location.clone();
    tokio::task::spawn_blocking(move || locate_from_config(&location))
        .await
        .context("Location task failed")
}

/// One-shot reflection fetch off the async threads
pub async fn fetch_reflection(config: &NoorConfig) -> Result<Reflection> {
    let reflection = config.reflection.clone();
    tokio::task::spawn_blocking(move || fetch_configured_reflection(reflection))
        .await
        .context("Reflection task failed")
}
