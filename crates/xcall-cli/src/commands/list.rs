//! `xcall list`: print every entry point with its signature.

use xcall_sdk::Side;

use super::GlobalArgs;
use crate::output::{self, StyledOutput};

pub fn execute(global: &GlobalArgs, side: Option<Side>) -> anyhow::Result<()> {
    let mut out = StyledOutput::new(output::resolve_color_choice(&global.color));
    let master = super::start(global)?;
    let boundary = master.boundary();

    let sides = match side {
        Some(side) => vec![side],
        None => vec![Side::Native, Side::Managed],
    };

    for side in sides {
        let table = boundary.exports(side);
        let plugins: Vec<String> = boundary
            .plugins()
            .iter()
            .filter(|(s, _)| *s == side)
            .map(|(_, info)| format!("{} v{}", info.name, info.version))
            .collect();

        out.bold(&format!("{}", side));
        out.dim(&format!(" ({} entry points", table.len()));
        if !plugins.is_empty() {
            out.dim(&format!(", {}", plugins.join(", ")));
        }
        out.dim(")");
        out.newline();

        for signature in table.signatures() {
            out.plain("  ");
            out.info(&signature.to_string());
            out.newline();
        }
        out.newline();
    }

    Ok(())
}
