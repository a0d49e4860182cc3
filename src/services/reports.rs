use crate::{
    entities::{invoice, order, quotation, Invoice, Order, Quotation},
    errors::ServiceError,
};
use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;

/// `?date=YYYY-MM-DD`; today (UTC) when absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportQuery {
    pub date: Option<String>,
}

impl ReportQuery {
    pub fn resolve_date(&self) -> Result<NaiveDate, ServiceError> {
        match self.date.as_deref().map(str::trim) {
            None | Some("") => Ok(Utc::now().date_naive()),
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| ServiceError::invalid_field("date", "must be a date (YYYY-MM-DD)")),
        }
    }
}

/// Half-open UTC range `[date 00:00, date+1 00:00)`.
fn day_bounds(date: NaiveDate) -> Result<(DateTime<Utc>, DateTime<Utc>), ServiceError> {
    let start = date
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| ServiceError::invalid_field("date", "out of range"))?;
    let end = start
        .checked_add_days(Days::new(1))
        .ok_or_else(|| ServiceError::invalid_field("date", "out of range"))?;
    Ok((start, end))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderTotals {
    pub count: u64,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub net_total: Decimal,
    pub by_status: BTreeMap<String, u64>,
}

/// Sum of stored amounts; overflow is a server-side failure, not a panic.
fn checked_total<I>(amounts: I) -> Result<Decimal, ServiceError>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
        .ok_or_else(|| ServiceError::InternalError("report total out of range".into()))
}

impl OrderTotals {
    pub fn from_orders(orders: &[order::Model]) -> Result<Self, ServiceError> {
        let mut by_status = BTreeMap::new();
        for o in orders {
            *by_status.entry(o.status.as_str().to_string()).or_default() += 1;
        }
        Ok(Self {
            count: orders.len() as u64,
            subtotal: checked_total(orders.iter().map(|o| o.subtotal))?,
            discount: checked_total(orders.iter().map(|o| o.discount))?,
            net_total: checked_total(orders.iter().map(|o| o.net_total))?,
            by_status,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuotationTotals {
    pub count: u64,
    pub net_total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub orders: OrderTotals,
    pub quotations: QuotationTotals,
}

#[derive(Debug, Clone, Serialize)]
pub struct QbLine {
    pub invoice_no: String,
    pub quotation_id: Option<String>,
    pub company: Option<String>,
    pub payment_term: Option<String>,
    pub net_total: Decimal,
    pub cr_by: Option<String>,
}

/// Day book of invoices for accounting export.
#[derive(Debug, Clone, Serialize)]
pub struct QbSummary {
    pub date: NaiveDate,
    pub invoice_count: u64,
    pub net_total: Decimal,
    pub lines: Vec<QbLine>,
}

#[derive(Clone)]
pub struct ReportService {
    db: Arc<DatabaseConnection>,
}

impl ReportService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Orders created on `date` and quotations dated `date`.
    #[instrument(skip(self))]
    pub async fn daily_summary(&self, date: NaiveDate) -> Result<DailySummary, ServiceError> {
        let (start, end) = day_bounds(date)?;

        let orders = Order::find()
            .filter(order::Column::CreatedAt.gte(start))
            .filter(order::Column::CreatedAt.lt(end))
            .all(&*self.db)
            .await?;

        let quotations = Quotation::find()
            .filter(quotation::Column::QuotationDate.eq(date))
            .all(&*self.db)
            .await?;

        Ok(DailySummary {
            date,
            orders: OrderTotals::from_orders(&orders)?,
            quotations: QuotationTotals {
                count: quotations.len() as u64,
                net_total: checked_total(quotations.iter().map(|q| q.net_total))?,
            },
        })
    }

    /// Invoices created on `date`, each with its quotation's commercial terms.
    #[instrument(skip(self))]
    pub async fn qb_summary(&self, date: NaiveDate) -> Result<QbSummary, ServiceError> {
        let (start, end) = day_bounds(date)?;

        let rows = Invoice::find()
            .filter(invoice::Column::CreatedAt.gte(start))
            .filter(invoice::Column::CreatedAt.lt(end))
            .order_by_asc(invoice::Column::InvoiceNo)
            .find_also_related(Quotation)
            .all(&*self.db)
            .await?;

        let lines: Vec<QbLine> = rows
            .into_iter()
            .map(|(inv, quote)| QbLine {
                invoice_no: inv.invoice_no,
                quotation_id: inv.quotation_id,
                company: quote.as_ref().and_then(|q| q.company.clone()),
                payment_term: quote.as_ref().and_then(|q| q.payment_term.clone()),
                net_total: quote.map(|q| q.net_total).unwrap_or(Decimal::ZERO),
                cr_by: inv.cr_by,
            })
            .collect();

        Ok(QbSummary {
            date,
            invoice_count: lines.len() as u64,
            net_total: checked_total(lines.iter().map(|l| l.net_total))?,
            lines,
        })
    }
}
