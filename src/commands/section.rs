use anyhow::{Context, Result, bail};
use tracing::info;

use protocol_extract::fields::{find_section, section_text_or};
use protocol_extract::parse_docx_file;

use super::extract::load_profile;
use crate::cli::SectionArgs;

pub fn run(args: SectionArgs) -> Result<()> {
    if args.number.is_none() && args.title.is_none() {
        bail!("section lookup needs --number, --title or both");
    }

    let profile = load_profile(args.profile.as_deref())?;
    let protocol = parse_docx_file(&args.input, &profile)
        .with_context(|| format!("processing failed for {}", args.input.display()))?;
    let document = &protocol.document;

    let number = args.number.as_deref();
    let title = args.title.as_deref();
    match find_section(document, number, title) {
        Some(section) => info!(
            number = ?section.number,
            title = ?section.title,
            "section found"
        ),
        None => info!("section not found, printing default"),
    }

    println!("{}", section_text_or(document, number, title, &args.default));
    Ok(())
}
