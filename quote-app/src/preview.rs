//! Printable client-facing quotation document.
//!
//! The preview renders exactly the live quote, its line items and the
//! derived totals, followed by the standard contractual terms. It is plain
//! text; the print collaborator takes it from there.

use std::fmt;

use quote_core::calculations::DerivedTotals;
use quote_core::models::{Country, LineItem, Province, Quote};

use crate::utils::{format_date_opt, format_money, format_rate};

/// Contractual boilerplate printed at the foot of every quotation.
pub const TERMS: &str = "\
TERMS AND CONDITIONS
1. This quotation is valid for thirty (30) days from the issue date unless
   a validity date is stated above.
2. Prices are in Canadian dollars (CAD) and exclude applicable taxes unless
   itemized in the totals section.
3. Analyses begin upon receipt of conforming samples and written acceptance
   of this quotation. Turnaround times are estimates in business days.
4. Invoices are payable net thirty (30) days. Overdue balances bear
   interest at 1.5% per month.
5. Samples are retained for thirty (30) days after the report is issued,
   then discarded unless return shipping is arranged by the client.
6. Results relate only to the items tested. This quotation and any ensuing
   report are confidential and intended solely for the sponsor named above.";

/// A quotation prepared for printing. `Display` renders the full document.
pub struct PreviewDocument<'a> {
    pub quote: &'a Quote,
    pub lines: &'a [LineItem],
    pub totals: &'a DerivedTotals,
}

impl PreviewDocument<'_> {
    fn location_line(&self) -> String {
        match self.quote.country {
            Country::Canada => match Province::parse(&self.quote.province) {
                Some(province) => format!(
                    "{} ({}), Canada",
                    province.name(),
                    province.as_str()
                ),
                None => format!("{}, Canada", self.quote.province),
            },
            Country::Other => "Outside Canada".to_string(),
        }
    }
}

impl fmt::Display for PreviewDocument<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let quote = self.quote;

        writeln!(f, "HIBALOGIQUE — LABORATORY SERVICES")?;
        writeln!(f, "QUOTATION")?;
        writeln!(f)?;

        let reference = if quote.reference.trim().is_empty() {
            "(draft)"
        } else {
            quote.reference.as_str()
        };
        writeln!(f, "Reference:    {}", reference)?;
        writeln!(f, "Issue date:   {}", format_date_opt(&quote.issue_date))?;
        writeln!(f, "Valid until:  {}", format_date_opt(&quote.valid_until))?;
        writeln!(f, "Destination:  {}", self.location_line())?;
        writeln!(f)?;

        writeln!(f, "Prepared for: {}", quote.sponsor)?;
        for detail in [&quote.address, &quote.phone, &quote.email, &quote.contact_info] {
            if !detail.trim().is_empty() {
                writeln!(f, "              {}", detail)?;
            }
        }
        writeln!(f)?;

        writeln!(
            f,
            "{:<22} {:<28} {:<12} {:>6} {:>12} {:>8} {:>12}",
            "Type of test", "Description", "Panel", "Days", "Unit price", "Samples", "Subtotal"
        )?;
        for (line, subtotal) in self.lines.iter().zip(&self.totals.line_subtotals) {
            let days = line
                .time_days
                .map(|d| d.normalize().to_string())
                .unwrap_or_else(|| "—".to_string());
            writeln!(
                f,
                "{:<22} {:<28} {:<12} {:>6} {:>12} {:>8} {:>12}",
                line.type_of_test,
                line.description,
                line.panel,
                days,
                format_money(line.unit_price),
                line.samples.normalize(),
                format_money(subtotal.amount)
            )?;
        }
        writeln!(f)?;

        writeln!(f, "Subtotal:        {}", format_money(self.totals.subtotal))?;
        if self.totals.discount_amount > rust_decimal::Decimal::ZERO {
            writeln!(
                f,
                "Discount ({}): -{}",
                format_rate(self.totals.discount_percent / rust_decimal::Decimal::ONE_HUNDRED),
                format_money(self.totals.discount_amount)
            )?;
        }
        writeln!(
            f,
            "Taxes ({}):  {}",
            format_rate(self.totals.tax_rate),
            format_money(self.totals.taxes)
        )?;
        writeln!(f, "TOTAL:           {}", format_money(self.totals.total))?;
        writeln!(f)?;
        writeln!(f, "All amounts in Canadian dollars (CAD).")?;
        writeln!(f)?;
        write!(f, "{}", TERMS)
    }
}

/// Renders the printable document to a string.
pub fn render(
    quote: &Quote,
    lines: &[LineItem],
    totals: &DerivedTotals,
) -> String {
    PreviewDocument {
        quote,
        lines,
        totals,
    }
    .to_string()
}
