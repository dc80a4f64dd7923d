use clap::{Args, ValueEnum};
use serde_json::{json, Value};

use mortgage_calc_core::presentation::{break_even_label, currency, percent, term_left_label};
use mortgage_calc_core::refinance::{
    self, NewTerm, RefinanceField, RefinanceForm, RefinanceInputs, RefinancePreset,
};
use mortgage_calc_core::CalculatorConfig;

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TermArg {
    #[value(name = "15")]
    Fifteen,
    #[value(name = "30")]
    Thirty,
    Custom,
}

impl From<TermArg> for NewTerm {
    fn from(arg: TermArg) -> Self {
        match arg {
            TermArg::Fifteen => NewTerm::Fifteen,
            TermArg::Thirty => NewTerm::Thirty,
            TermArg::Custom => NewTerm::Custom,
        }
    }
}

/// Arguments for the refinance comparison. Values are free text and go
/// through the same normalization as the website form.
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct RefinanceArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Start from the sample scenario instead of a blank form
    #[arg(long)]
    pub sample: bool,

    /// Current loan balance
    #[arg(long)]
    pub balance: Option<String>,

    /// Current rate in percent
    #[arg(long)]
    pub current_rate: Option<String>,

    /// Whole years left on the current loan
    #[arg(long)]
    pub remaining_years: Option<String>,

    /// Extra months left on the current loan (0-11)
    #[arg(long)]
    pub remaining_months: Option<String>,

    /// Monthly property tax
    #[arg(long)]
    pub tax: Option<String>,

    /// Monthly insurance
    #[arg(long, alias = "ins")]
    pub insurance: Option<String>,

    /// Monthly HOA dues
    #[arg(long)]
    pub hoa: Option<String>,

    /// Snap the new rate to the nearest 0.125%
    #[arg(long)]
    pub snap: bool,

    /// Proposed rate in percent
    #[arg(long)]
    pub new_rate: Option<String>,

    /// Proposed term
    #[arg(long, value_enum)]
    pub term: Option<TermArg>,

    /// Term in years when --term custom
    #[arg(long)]
    pub custom_term_years: Option<String>,

    /// Closing costs; defaults to 1.5% of the base loan
    #[arg(long)]
    pub closing_costs: Option<String>,

    /// Discount points in percent of the loan (1 = one point)
    #[arg(long)]
    pub points: Option<String>,

    /// Finance closing costs and points into the new loan
    #[arg(long)]
    pub roll_costs: bool,

    /// Cash taken out at closing
    #[arg(long)]
    pub cash_out: Option<String>,

    /// Cash brought to closing
    #[arg(long)]
    pub cash_in: Option<String>,

    /// Comparison horizon in years
    #[arg(long)]
    pub horizon_years: Option<String>,
}

pub fn run_refinance(
    args: RefinanceArgs,
    config: &CalculatorConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs: RefinanceInputs = match input::stdin::read_document(args.input.as_deref())? {
        Some(doc) => doc,
        None => inputs_from_flags(&args, config),
    };

    let output = refinance::analyze_refinance(&inputs, config)?;
    let r = &output.result;
    let display = json!({
        "monthly_savings": currency(r.monthly_savings, 0),
        "annual_savings": currency(r.annual_savings, 0),
        "break_even": break_even_label(r.break_even),
        "total_refi_costs": currency(r.total_refi_costs, 0),
        "points": percent(inputs.discount_points, 2),
        "old_monthly_payment": currency(r.old_total_payment, 0),
        "new_monthly_payment": currency(r.new_total_payment, 0),
        "old_term_left": term_left_label(r.months_remaining),
        "new_loan_amount": currency(r.new_loan_amount, 0),
        "horizon_savings": currency(r.horizon.horizon_savings, 0),
        "old_interest_remaining": currency(r.old_interest_remaining, 0),
        "new_total_interest": currency(r.new_total_interest, 0),
    });

    let mut value = serde_json::to_value(&output)?;
    value["display"] = display;
    Ok(value)
}

fn inputs_from_flags(args: &RefinanceArgs, config: &CalculatorConfig) -> RefinanceInputs {
    let mut form = RefinanceForm::new(config.clone());
    if args.sample {
        form.apply_preset(RefinancePreset::Sample);
    }
    // Snapping applies at rate entry, so it must be set first.
    if args.snap {
        form.set_snap_to_eighths(true);
    }
    if let Some(term) = args.term {
        form.set_new_term(term.into());
    }
    if args.roll_costs {
        form.set_roll_costs(true);
    }

    let fields = [
        (RefinanceField::CurrentBalance, &args.balance),
        (RefinanceField::CurrentRate, &args.current_rate),
        (RefinanceField::RemainingTermYears, &args.remaining_years),
        (RefinanceField::RemainingTermMonths, &args.remaining_months),
        (RefinanceField::Taxes, &args.tax),
        (RefinanceField::Insurance, &args.insurance),
        (RefinanceField::Hoa, &args.hoa),
        (RefinanceField::NewRate, &args.new_rate),
        (RefinanceField::CustomTermYears, &args.custom_term_years),
        (RefinanceField::ClosingCosts, &args.closing_costs),
        (RefinanceField::PointsPercent, &args.points),
        (RefinanceField::CashOut, &args.cash_out),
        (RefinanceField::CashIn, &args.cash_in),
        (RefinanceField::HorizonYears, &args.horizon_years),
    ];
    for (field, raw) in fields {
        if let Some(raw) = raw {
            form.set_field(field, raw);
        }
    }

    form.to_inputs()
}
