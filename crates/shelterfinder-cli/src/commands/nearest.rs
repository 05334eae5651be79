//! `nearest` subcommand: rank and list the closest shelters.

use anyhow::{bail, Context, Result};
use shelterfinder_cli::output::{render_json, render_text, Glyphs, OutputFormat};
use shelterfinder_cli::terminal::{supports_unicode, ColorPalette};
use shelterfinder_lib::{
    AppConfig, AppController, FixedLocation, GeoPoint, MemoryList, MemoryMap, MemoryStatus,
    NoLocation,
};
use tracing::debug;

use crate::NearestArgs;

type HeadlessController = AppController<MemoryMap, MemoryList, MemoryStatus>;

pub async fn handle_nearest(
    args: &NearestArgs,
    mut config: AppConfig,
    format: OutputFormat,
    palette: ColorPalette,
) -> Result<()> {
    if let Some(limit) = args.limit {
        config.max_shelters = limit;
    }
    config.validate().context("invalid options")?;

    let mut app = AppController::new(
        config,
        MemoryMap::default(),
        MemoryList::default(),
        MemoryStatus::default(),
    );

    // without coordinates the host behaves like a device with no positioning
    let started = match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => app.start(&FixedLocation(GeoPoint::new(lat, lng))).await,
        _ => app.start(&NoLocation).await,
    };
    if let Err(err) = started {
        report_fatal(&app);
        return Err(err).context("failed to load the shelter dataset");
    }

    if let Some(rank) = args.select {
        select_rank(&mut app, rank)?;
    }

    let snapshot = app.snapshot();
    match format {
        OutputFormat::Json => println!("{}", render_json(&snapshot)?),
        OutputFormat::Text => {
            let glyphs = if supports_unicode() {
                Glyphs::unicode()
            } else {
                Glyphs::ascii()
            };
            print!("{}", render_text(&snapshot, &palette, glyphs));
            if let Some(popup) = app
                .presentation()
                .selected()
                .and_then(|index| app.presentation().marker_at(index))
                .and_then(|marker| app.map().popup(marker))
            {
                println!("\n{popup}");
            }
        }
    }
    Ok(())
}

fn select_rank(app: &mut HeadlessController, rank: usize) -> Result<()> {
    let rendered = app.presentation().len();
    if rank == 0 || rank > rendered {
        bail!("--select must be between 1 and {rendered}");
    }
    let marker = app.select_list_entry(rank - 1);
    debug!(rank, ?marker, "selected list entry");
    Ok(())
}

fn report_fatal(app: &HeadlessController) {
    if let Some(status) = app.status().current() {
        eprintln!("{}", status.text);
    }
}
