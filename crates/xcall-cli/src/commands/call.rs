//! `xcall call <NAME>`: issue one reverse call.

use super::GlobalArgs;
use crate::output::{self, StyledOutput};

pub fn execute(global: &GlobalArgs, name: &str) -> anyhow::Result<()> {
    let mut out = StyledOutput::new(output::resolve_color_choice(&global.color));
    let master = super::start(global)?;

    match master.reverse_call(name)? {
        Some(result) => {
            out.plain(&result);
            out.newline();
        }
        None => {
            out.dim(&format!("{}: no result delivered", name));
            out.newline();
        }
    }
    Ok(())
}
