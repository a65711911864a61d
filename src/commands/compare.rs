//! `compare` command: diff and classify two build files

use crate::cli::CompareArgs;
use crate::commands::dispatch::CommandContext;
use crate::commands::input;
use crate::commands::report::{human, records};
use openqa_review_core::error::Result;
use openqa_review_core::format::records_header;
use openqa_review_core::review::Reviewer;
use tracing::{debug, warn};

pub fn execute(ctx: &CommandContext, args: &CompareArgs) -> Result<()> {
    let current = input::load_build(&args.current)?;
    let previous = args
        .previous
        .as_deref()
        .map(input::load_build)
        .transpose()?;

    if let Some(previous) = &previous {
        if !previous.key().same_variant(current.key()) {
            warn!(
                current = %current.key(),
                previous = %previous.key(),
                "comparing builds of different variants"
            );
        }
        if previous.id() >= current.id() {
            warn!(current = %current.id(), previous = %previous.id(), "previous build is not older");
        }
    }

    let review = Reviewer::new(ctx.config.clone()).review_variant(&current, previous.as_ref(), None);
    debug!(elapsed = ?ctx.start.elapsed(), "compare");

    crate::output_by_format!(ctx.cli.format,
        json => { println!("{}", serde_json::to_string_pretty(&review)?); },
        human => { print!("{}", human::render_variant(&review, ctx.cli.verbose)); },
        records => {
            println!(
                "{}",
                records_header(
                    "compare",
                    &[
                        ("group", current.key().job_group.clone()),
                        ("build", current.id().to_string()),
                    ],
                )
            );
            for line in records::variant_lines(&review) {
                println!("{}", line);
            }
        }
    );
    Ok(())
}
