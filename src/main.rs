use std::env;

use anyhow::Context;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use strum::IntoEnumIterator;

use pe_limits::catalog::{EightyPlus, EmcStandard, WeightingStandard};
use pe_limits::config::Settings;
use pe_limits::{export, DetectorLimit};

fn main() -> anyhow::Result<()> {
    init_logging();
    log::info!("Power converter limit report");

    let settings_path = env::args().nth(1).unwrap_or_else(|| "./settings.json".to_string());
    let settings = Settings::load_or_default(&settings_path)?;

    report_emc(&settings)?;
    report_weighted_efficiency(&settings)?;
    report_certifications(&settings)?;
    Ok(())
}

fn init_logging() {
    if let Err(err) = log4rs::init_file("./log.yml", Default::default()) {
        let stdout = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {h({l})} {m}{n}")))
            .build();
        let config = Config::builder()
            .appender(Appender::builder().build("stdout", Box::new(stdout)))
            .build(Root::builder().appender("stdout").build(LevelFilter::Info));
        match config {
            Ok(config) => {
                if log4rs::init_config(config).is_ok() {
                    log::warn!("log.yml not loaded ({}), logging to console", err);
                }
            }
            Err(e) => eprintln!("failed to configure logging: {}", e),
        }
    }
}

fn fmt_limit(limit: DetectorLimit) -> String {
    if limit.available {
        format!("{:.1} dBµV ({:.3e} V)", limit.dbuv, limit.volts)
    } else {
        "-".to_string()
    }
}

fn report_emc(settings: &Settings) -> anyhow::Result<()> {
    for standard in EmcStandard::iter() {
        let mask = standard
            .mask_for_class(settings.emc_class)
            .with_context(|| format!("building {}", standard))?;

        for &f in &settings.query_frequencies_hz {
            let q = mask.interpolate(f)?;
            log::info!(
                "{} @ {:.3} MHz | AVG {} | QP {} | PK {}",
                mask.name(),
                f / 1e6,
                fmt_limit(q.average),
                fmt_limit(q.quasi_peak),
                fmt_limit(q.peak)
            );
        }

        let path = export::write_limit_mask(&settings.export_dir, &mask, settings.export_points)?;
        log::info!("{}: exported to {}", mask.name(), path.display());
    }
    Ok(())
}

fn report_weighted_efficiency(settings: &Settings) -> anyhow::Result<()> {
    for set in &settings.weighted_measurements {
        let dir = settings.export_dir.join(export::file_stem(&set.name));
        for standard in WeightingStandard::iter() {
            let profile = standard.profile();
            match profile.evaluate(&set.load_levels, &set.efficiencies) {
                Ok(result) => {
                    log::info!("{} | {}: {:.2}%", set.name, profile.name(), result.score_percent());
                    export::write_weighted_efficiency(&dir, &result)?;
                }
                Err(e) => log::warn!("{} | {}: skipped, {}", set.name, profile.name(), e),
            }
        }
    }
    Ok(())
}

fn report_certifications(settings: &Settings) -> anyhow::Result<()> {
    for set in &settings.psu_measurements {
        let dir = settings.export_dir.join(export::file_stem(&set.name));
        for tier in EightyPlus::iter() {
            let report = tier
                .mask()
                .check(&set.load_levels, &set.efficiencies)
                .with_context(|| format!("checking {} against {}", set.name, tier))?;
            export::write_certification(&dir, &report)?;
        }
        match EightyPlus::highest_passed(&set.load_levels, &set.efficiencies)? {
            Some(tier) => log::info!("{}: meets {}", set.name, tier),
            None => log::info!("{}: meets no 80 PLUS tier", set.name),
        }
    }
    Ok(())
}
