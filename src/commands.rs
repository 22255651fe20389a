//! Command implementations behind the `qcadmin` CLI.
use crate::cli::{GlobalArgs, InitConfigArgs, NormalizeArgs, RegisterArgs, SampleArgs};
use crate::config::{
    config_stub, default_config, default_config_path, resolve_config, write_config,
};
use crate::error::ValidationError;
use crate::gateway::HttpMerchantApi;
use crate::registration::{
    normalize, sample_payload, Attachment, BusinessForm, ContactForm, DocumentKind,
    MerchantRegistration, PaymentForm, ReviewSection, StepData, StepForm,
};
use crate::wizard::{ActiveStep, Notice, RegistrationWizard};
use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::Path;

pub fn run_register(global: &GlobalArgs, args: RegisterArgs) -> Result<()> {
    let answers = read_json(&args.answers)?;
    if !answers.is_object() {
        return Err(anyhow!(
            "answers in {} must be a JSON object",
            args.answers.display()
        ));
    }
    let documents = [
        (DocumentKind::TaxCertificate, args.tax_certificate.as_ref()),
        (
            DocumentKind::BusinessRegistration,
            args.business_certificate.as_ref(),
        ),
    ];

    let mut wizard = RegistrationWizard::new();
    let mut review = loop {
        let data = match wizard.active_step() {
            ActiveStep::Contact(_) => checked(&parse_answers::<ContactForm>(&answers)?)?,
            ActiveStep::Business(_) => checked(&parse_answers::<BusinessForm>(&answers)?)?,
            ActiveStep::Payment(_) => checked(&parse_answers::<PaymentForm>(&answers)?)?,
            ActiveStep::Documents(mut form) => {
                for (kind, path) in documents {
                    let Some(path) = path else { continue };
                    let file = Attachment::from_path(path)?;
                    form.select(kind, file)
                        .with_context(|| format!("attach {} {}", kind.title(), path.display()))?;
                }
                checked(&form)?
            }
            ActiveStep::Review(review) => break review,
        };
        wizard.advance(data);
    };

    if !args.json {
        print_review(&review.sections);
    }
    review.acceptance = parse_answers(&answers)?;
    let terms = checked(&review)?;

    if args.dry_run {
        let mut draft = wizard.draft().clone();
        draft.merge(terms);
        let payload = normalize(&draft.to_form_value());
        print_payload(&payload)?;
        return Ok(());
    }

    let config = resolve_config(global.config.as_deref(), global.api_base_url.as_deref())?;
    let api = HttpMerchantApi::new(config);
    let result = wizard.submit(&api, review.acceptance);
    if let Some(notice) = wizard.notice() {
        print_notice(notice, args.json);
    }
    let payload = result.context("submit merchant registration")?;
    if args.json {
        print_payload(&payload)?;
    }
    Ok(())
}

pub fn run_normalize(args: NormalizeArgs) -> Result<()> {
    let raw = read_json(&args.input)?;
    print_payload(&normalize(&raw))
}

pub fn run_sample(_args: SampleArgs) -> Result<()> {
    print_payload(&sample_payload())
}

pub fn run_init_config(global: &GlobalArgs, args: InitConfigArgs) -> Result<()> {
    if args.stdout {
        println!("{}", config_stub());
        return Ok(());
    }
    let path = global
        .config
        .clone()
        .or_else(default_config_path)
        .ok_or_else(|| anyhow!("no config directory found; pass --config <PATH>"))?;
    if path.is_file() && !args.force {
        return Err(anyhow!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        ));
    }
    write_config(&path, &default_config())?;
    println!("wrote {}", path.display());
    Ok(())
}

fn read_json(path: &Path) -> Result<Value> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("read stdin")?;
        text
    } else {
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?
    };
    serde_json::from_str(&text).with_context(|| format!("parse JSON from {}", path.display()))
}

/// Deserialize one step's fields out of the flat answers object.
fn parse_answers<T: DeserializeOwned>(answers: &Value) -> Result<T> {
    serde_json::from_value(answers.clone()).with_context(|| {
        format!(
            "parse {} answers",
            std::any::type_name::<T>().rsplit("::").next().unwrap_or("step")
        )
    })
}

/// Submit a step form, turning field errors into one readable report.
fn checked<F: StepForm>(form: &F) -> Result<StepData> {
    form.submit().map_err(|err| anyhow!(describe(&err)))
}

fn describe(err: &ValidationError) -> String {
    let mut text = format!("{} step is incomplete:", err.step.title());
    for (field, message) in &err.fields {
        text.push_str(&format!("\n  {field}: {message}"));
    }
    text
}

fn print_review(sections: &[ReviewSection]) {
    for section in sections {
        println!("{}", section.title);
        for row in &section.rows {
            println!("  {}: {}", row.label, row.value);
        }
    }
}

fn print_notice(notice: &Notice, json: bool) {
    let (title, description) = match notice {
        Notice::Success { title, description } | Notice::Error { title, description } => {
            (title, description)
        }
    };
    if json {
        eprintln!("{title}: {description}");
    } else {
        println!("{title}");
        println!("{description}");
    }
}

fn print_payload(payload: &MerchantRegistration) -> Result<()> {
    let text = serde_json::to_string_pretty(payload).context("serialize payload")?;
    println!("{text}");
    Ok(())
}
