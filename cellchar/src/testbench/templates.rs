use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::Lib;
use crate::error::Result;

pub(crate) const TEMPLATES_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/templates");

pub(crate) const CAPFIT_TEMPLATE: &str = "capfit.sp";
pub(crate) const DELAY_TEMPLATE: &str = "delay.sp";

lazy_static! {
    pub(crate) static ref TEMPLATES: Tera = {
        match Tera::new(&format!("{TEMPLATES_PATH}/*.sp")) {
            Ok(t) => t,
            Err(e) => {
                panic!("Encountered errors while parsing Tera templates: {e}");
            }
        }
    };
}

#[derive(Serialize)]
pub(crate) struct PulseCtx {
    pub(crate) delay: String,
    pub(crate) slew: String,
    pub(crate) width: String,
    pub(crate) period: String,
}

#[derive(Serialize)]
pub(crate) struct CapFitCtx {
    pub(crate) initial: String,
    pub(crate) lower: String,
    pub(crate) upper: String,
    pub(crate) resistance: String,
    pub(crate) iterations: usize,
}

#[derive(Serialize)]
pub(crate) struct DeckCtx<'a> {
    pub(crate) title: String,
    pub(crate) libs: &'a [Lib],
    pub(crate) includes: &'a [PathBuf],
    pub(crate) netlist: &'a Path,
    pub(crate) subckt: &'a str,
    pub(crate) connections: Vec<String>,
    pub(crate) temp: Option<String>,
    pub(crate) supply: String,
    pub(crate) bias: String,
    /// The 50% crossing threshold.
    pub(crate) half: String,
    pub(crate) pulse: PulseCtx,
    pub(crate) step: String,
    pub(crate) stop: String,
    pub(crate) capfit: Option<CapFitCtx>,
    pub(crate) load: Option<String>,
}

pub(crate) fn render_deck(template: &str, ctx: DeckCtx<'_>) -> Result<String> {
    let ctx = Context::from_serialize(ctx)?;
    let deck = TEMPLATES.render(template, &ctx)?;
    Ok(deck)
}
