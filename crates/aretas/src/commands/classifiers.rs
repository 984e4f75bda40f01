//! Data classifier command handlers.

use tabled::Tabled;

use aretas_core::{AretasClient, ensure_success};
use aretas_core::models::{DataClassifier, DataClassifierRecord};

use crate::cli::{ClassifiersArgs, ClassifiersCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ClassifierRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Types")]
    required_types: String,
    #[tabled(rename = "Public")]
    public: String,
}

impl From<&DataClassifier> for ClassifierRow {
    fn from(c: &DataClassifier) -> Self {
        Self {
            id: c.id.clone(),
            label: c.label.clone(),
            description: c.description.clone(),
            required_types: util::join(&c.required_types),
            public: output::yes_no(c.is_public),
        }
    }
}

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Sensors")]
    macs: String,
    #[tabled(rename = "Types")]
    target_types: String,
}

impl From<&DataClassifierRecord> for RecordRow {
    fn from(r: &DataClassifierRecord) -> Self {
        Self {
            id: r.id.clone(),
            start: output::format_millis(r.start_timestamp),
            end: output::format_millis(r.end_timestamp),
            macs: util::join(&r.assoc_macs),
            target_types: util::join(&r.target_types),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &AretasClient,
    args: ClassifiersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ClassifiersCommand::List => {
            let classifiers =
                util::require(client.list_data_classifiers().await?, "data classifiers")?;
            let out = output::render_list(
                &global.output,
                &classifiers,
                |c| ClassifierRow::from(c),
                |c| c.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ClassifiersCommand::Records { classifier_id } => {
            let records = util::require(
                client.classifier_records_by_id(&classifier_id).await?,
                "classifier records",
            )?;
            let out = output::render_list(
                &global.output,
                &records,
                |r| RecordRow::from(r),
                |r| r.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ClassifiersCommand::Purge { classifier_id } => {
            if !util::confirm(
                &format!("Delete every record of classifier '{classifier_id}'?"),
                global.yes,
            )? {
                return Ok(());
            }
            let envelope = client.purge_classifier_records(&classifier_id).await?;
            let envelope = ensure_success(envelope)?;
            if !global.quiet {
                eprintln!("Records purged: {}", envelope.message);
            }
            Ok(())
        }
    }
}
