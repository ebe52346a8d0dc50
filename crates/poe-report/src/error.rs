//! CLI error types with miette diagnostics.
//!
//! Every failure exits with status 1; the diagnostics carry the actionable
//! detail instead of the exit code.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(poe_report::config),
        help(
            "Required environment variables:\n\
             MERAKI_API_KEY   dashboard API key\n\
             MERAKI_ORG_NAME  organization display name\n\
             Optional: MERAKI_BASE_URL, MERAKI_TIMEOUT, MERAKI_OUTPUT"
        )
    )]
    Config(#[source] Box<figment::Error>),

    // ── Resolution ───────────────────────────────────────────────────
    #[error("Organization '{name}' not found")]
    #[diagnostic(
        code(poe_report::org_not_found),
        help(
            "Check that MERAKI_ORG_NAME matches an organization visible to\n\
             this API key (the match is exact, including case)."
        )
    )]
    OrganizationNotFound { name: String },

    // ── Collaborators ────────────────────────────────────────────────
    #[error(transparent)]
    Api(#[from] meraki_api::Error),

    #[error(transparent)]
    Pipeline(#[from] poe_report_core::PipelineError),

    #[error("Failed to write workbook: {0}")]
    #[diagnostic(code(poe_report::workbook))]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
}
