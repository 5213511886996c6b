use serde::{Deserialize, Serialize};

use atelier_core::{ClientId, InvoiceId, ProductId};

use crate::status::{DocumentKind, InvoiceStatus};

/// One invoice line. Discount is a fraction of the line subtotal
/// (0.10 = 10%), tax rate a fraction applied after discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub product_id: ProductId,
    pub quantity: f64,
    pub unit_price: f64,
    pub tax_rate: f64,
    pub discount: f64,
}

impl InvoiceLine {
    /// Line subtotal after discount, before tax.
    pub fn net_amount(&self) -> f64 {
        self.quantity * self.unit_price * (1.0 - self.discount)
    }

    pub fn tax_amount(&self) -> f64 {
        self.net_amount() * self.tax_rate
    }
}

/// Derived totals. Never stored; recomputed from lines on every load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

/// Invoice/delivery-note aggregate: header + lines + computed totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub client_id: ClientId,
    pub kind: DocumentKind,
    pub status: InvoiceStatus,
    pub lines: Vec<InvoiceLine>,
}

impl Invoice {
    pub fn totals(&self) -> Totals {
        let subtotal: f64 = self.lines.iter().map(InvoiceLine::net_amount).sum();
        let tax: f64 = self.lines.iter().map(InvoiceLine::tax_amount).sum();
        Totals {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(qty: f64, price: f64, tax: f64, discount: f64) -> InvoiceLine {
        InvoiceLine {
            product_id: ProductId::new(1),
            quantity: qty,
            unit_price: price,
            tax_rate: tax,
            discount,
        }
    }

    #[test]
    fn totals_apply_discount_before_tax() {
        let invoice = Invoice {
            id: InvoiceId::new(1),
            client_id: ClientId::new(1),
            kind: DocumentKind::Order,
            status: InvoiceStatus::Draft,
            lines: vec![line(10.0, 100.0, 0.2, 0.1)],
        };
        let totals = invoice.totals();
        assert!((totals.subtotal - 900.0).abs() < 1e-9);
        assert!((totals.tax - 180.0).abs() < 1e-9);
        assert!((totals.total - 1080.0).abs() < 1e-9);
    }

    #[test]
    fn totals_sum_across_lines() {
        let invoice = Invoice {
            id: InvoiceId::new(1),
            client_id: ClientId::new(1),
            kind: DocumentKind::Standard,
            status: InvoiceStatus::Draft,
            lines: vec![line(1.0, 50.0, 0.0, 0.0), line(2.0, 25.0, 0.0, 0.0)],
        };
        assert!((invoice.totals().total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn empty_invoice_totals_are_zero() {
        let invoice = Invoice {
            id: InvoiceId::new(1),
            client_id: ClientId::new(1),
            kind: DocumentKind::Order,
            status: InvoiceStatus::Draft,
            lines: vec![],
        };
        assert_eq!(invoice.totals().total, 0.0);
    }
}
