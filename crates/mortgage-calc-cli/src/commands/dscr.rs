use clap::{Args, ValueEnum};
use serde_json::{json, Value};

use mortgage_calc_core::dscr::{
    self, selection_description, DscrField, DscrForm, LoanInputs, PaymentType,
};
use mortgage_calc_core::presentation::{currency, ratio};
use mortgage_calc_core::CalculatorConfig;

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PaymentTypeArg {
    /// 30-year fully amortized
    Amort,
    /// Interest-only for 10 years
    Io,
}

impl From<PaymentTypeArg> for PaymentType {
    fn from(arg: PaymentTypeArg) -> Self {
        match arg {
            PaymentTypeArg::Amort => PaymentType::Amortized,
            PaymentTypeArg::Io => PaymentType::InterestOnly,
        }
    }
}

/// Arguments for the DSCR calculator. Unset fields keep the calculator's
/// opening scenario; values are free text ("$2,500").
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct DscrArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Gross monthly rent
    #[arg(long)]
    pub rent: Option<String>,

    /// Monthly property tax
    #[arg(long)]
    pub tax: Option<String>,

    /// Monthly insurance
    #[arg(long, alias = "ins")]
    pub insurance: Option<String>,

    /// Monthly HOA dues
    #[arg(long)]
    pub hoa: Option<String>,

    /// Loan amount
    #[arg(long)]
    pub loan: Option<String>,

    /// Annual rate in percent (7.25)
    #[arg(long)]
    pub rate: Option<String>,

    /// Payment type to qualify on
    #[arg(long, value_enum)]
    pub payment_type: Option<PaymentTypeArg>,
}

pub fn run_dscr(
    args: DscrArgs,
    config: &CalculatorConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs: LoanInputs = match input::stdin::read_document(args.input.as_deref())? {
        Some(doc) => doc,
        None => inputs_from_flags(&args, config),
    };

    let output = dscr::analyze_dscr(&inputs, config)?;
    let r = &output.result;
    let display = json!({
        "dscr": ratio(r.dscr_ratio),
        "status": r.qualification_tier.label(),
        "amortized_pitia": currency(r.amortized_monthly_payment, 0),
        "interest_only_pitia": currency(r.interest_only_monthly_payment, 0),
        "monthly_rent": currency(inputs.gross_monthly_rent, 0),
        "selection": selection_description(r.payment_type),
    });

    let mut value = serde_json::to_value(&output)?;
    value["display"] = display;
    Ok(value)
}

fn inputs_from_flags(args: &DscrArgs, config: &CalculatorConfig) -> LoanInputs {
    let mut form = DscrForm::new(config.clone());
    let fields = [
        (DscrField::Rent, &args.rent),
        (DscrField::Tax, &args.tax),
        (DscrField::Insurance, &args.insurance),
        (DscrField::Hoa, &args.hoa),
        (DscrField::Loan, &args.loan),
        (DscrField::Rate, &args.rate),
    ];
    for (field, raw) in fields {
        if let Some(raw) = raw {
            form.set_field(field, raw);
        }
    }
    if let Some(pt) = args.payment_type {
        form.set_payment_type(pt.into());
    }
    form.inputs().clone()
}
