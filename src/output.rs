use tracing::info;

use crate::error::Result;
use crate::i18n::Translator;
use crate::pricing::format_euros;
use crate::quote::QuoteRequest;
use crate::submit::{Receipt, Submission};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Print,
    Clipboard,
}

pub fn handle_output(text: &str, mode: OutputMode) -> Result<()> {
    match mode {
        OutputMode::Print => {
            println!("{}", text);
        }
        OutputMode::Clipboard => {
            let mut clipboard = arboard::Clipboard::new()?;
            clipboard.set_text(text)?;
            info!("receipt copied to clipboard");
        }
    }
    Ok(())
}

/// One `label: value` line per filled-in field of the quote.
pub fn quote_lines(req: &QuoteRequest, t: &Translator) -> Vec<(String, String)> {
    let none = t.t("summary.none");
    let mut lines = Vec::new();

    lines.push((
        t.t("fields.trip_type"),
        req.trip_type()
            .map(|trip| t.t(trip.label_key()))
            .unwrap_or_else(|| none.clone()),
    ));
    lines.push((t.t("summary.route"), req.route()));

    let dates = match (req.departure_date(), req.return_date()) {
        (Some(dep), Some(ret)) => format!("{} – {}", dep.format("%d/%m/%Y"), ret.format("%d/%m/%Y")),
        (Some(dep), None) => dep.format("%d/%m/%Y").to_string(),
        _ => none.clone(),
    };
    lines.push((t.t("summary.dates"), dates));
    lines.push((t.t("fields.passengers"), req.passengers().to_string()));

    if let Some(aircraft) = req.aircraft() {
        lines.push((t.t("fields.aircraft"), aircraft.name.to_string()));
    }
    if !req.services().is_empty() {
        let labels: Vec<String> = req.services().iter().map(|s| t.t(s.label_key())).collect();
        lines.push((t.t("summary.services"), labels.join(", ")));
    }

    lines.push((t.t("fields.name"), req.contact.name.clone()));
    lines.push((t.t("fields.email"), req.contact.email.clone()));
    lines.push((t.t("fields.phone"), req.contact.phone.clone()));
    if !req.contact.message.trim().is_empty() {
        lines.push((t.t("fields.message"), req.contact.message.clone()));
    }
    if let Some(total) = req.estimate() {
        lines.push((t.t("summary.estimate"), format_euros(total)));
    }

    lines
}

pub fn receipt_summary(receipt: &Receipt, t: &Translator) -> String {
    let mut out = format!(
        "{}: {}\n",
        t.t("summary.reference"),
        receipt.reference
    );

    match &receipt.submission {
        Submission::Quote(req) => {
            for (label, value) in quote_lines(req, t) {
                out.push_str(&format!("{}: {}\n", label, value));
            }
            if req.estimate().is_some() {
                out.push_str(&t.t("summary.estimate_note"));
                out.push('\n');
            }
        }
        Submission::Contact(form) => {
            out.push_str(&format!("{}: {}\n", t.t("fields.name"), form.name));
            out.push_str(&format!("{}: {}\n", t.t("fields.email"), form.email));
        }
    }

    out
}
