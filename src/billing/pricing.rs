//! Appointment pricing form: line items plus the custom price override

use super::line_items::{aggregate, LineItem};
use crate::error::{CabinetError, CabinetResult};
use crate::models::{Appointment, CabinetService, Money};

/// Editable pricing of an appointment
///
/// While the override is off the total always equals the sum of the lines
/// and cannot be typed in. Turning the override on freezes the current
/// total for manual entry; turning it off recomputes it straight away.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingForm {
    lines: Vec<LineItem>,
    custom_price: bool,
    total: Money,
}

impl PricingForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computed pricing over a set of services
    pub fn for_services(services: &[CabinetService]) -> CabinetResult<Self> {
        let mut form = Self::new();
        for service in services {
            form.add_service(service)?;
        }
        Ok(form)
    }

    /// Pricing as stored on an existing appointment
    pub fn from_appointment(appointment: &Appointment) -> CabinetResult<Self> {
        let mut form = Self::new();
        for line in appointment.line_items() {
            form.add_line(line)?;
        }
        if appointment.is_custom_price {
            form.custom_price = true;
            form.total = appointment.total_amount;
        }
        Ok(form)
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn is_custom_price(&self) -> bool {
        self.custom_price
    }

    /// Sum of the lines, regardless of the override
    ///
    /// Every line passed `add_line`, so the sum is in range.
    pub fn computed_total(&self) -> Money {
        self.lines
            .iter()
            .map(|line| line.price * line.quantity())
            .sum()
    }

    /// Append a line; a negative price or an overflowing total is refused
    /// and leaves the form unchanged
    pub fn add_line(&mut self, line: LineItem) -> CabinetResult<()> {
        self.lines.push(line);
        if let Err(e) = aggregate(&self.lines) {
            self.lines.pop();
            return Err(e);
        }
        self.recompute();
        Ok(())
    }

    pub fn add_service(&mut self, service: &CabinetService) -> CabinetResult<()> {
        self.add_line(LineItem::from(service))
    }

    pub fn remove_line(&mut self, index: usize) -> Option<LineItem> {
        if index >= self.lines.len() {
            return None;
        }
        let removed = self.lines.remove(index);
        self.recompute();
        Some(removed)
    }

    pub fn clear_lines(&mut self) {
        self.lines.clear();
        self.recompute();
    }

    /// Toggle the override
    pub fn set_custom_price(&mut self, on: bool) {
        self.custom_price = on;
        self.recompute();
    }

    /// Enter a total by hand; only allowed with the override on
    pub fn set_total(&mut self, total: Money) -> CabinetResult<()> {
        if !self.custom_price {
            return Err(CabinetError::Validation(
                "Enable custom price to edit the total".into(),
            ));
        }
        if total.is_negative() {
            return Err(CabinetError::Validation(
                "totalAmount must be non-negative".into(),
            ));
        }
        self.total = total;
        Ok(())
    }

    /// Parse and enter a typed total
    pub fn set_total_input(&mut self, raw: &str) -> CabinetResult<Money> {
        let total = Money::parse(raw)
            .map_err(|_| CabinetError::Validation("totalAmount must be a number".into()))?;
        self.set_total(total)?;
        Ok(total)
    }

    /// Write the total and override flag onto an appointment
    pub fn apply_to(&self, appointment: &mut Appointment) {
        appointment.total_amount = self.total;
        appointment.is_custom_price = self.custom_price;
    }

    fn recompute(&mut self) {
        if !self.custom_price {
            self.total = self.computed_total();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_lines() -> PricingForm {
        let mut form = PricingForm::new();
        form.add_line(LineItem::new("Consultation", Money::from_cents(10000)))
            .unwrap();
        form.add_line(LineItem::new("Cleaning", Money::from_cents(15000)))
            .unwrap();
        form
    }

    #[test]
    fn test_override_round_trip() {
        let mut form = two_lines();
        assert_eq!(form.total(), Money::from_cents(25000));

        form.set_custom_price(true);
        assert_eq!(form.total(), Money::from_cents(25000));
        form.set_total(Money::from_cents(99900)).unwrap();
        assert_eq!(form.total(), Money::from_cents(99900));

        // line edits do not touch a custom total
        form.add_line(LineItem::new("X-ray", Money::from_cents(5000)))
            .unwrap();
        assert_eq!(form.total(), Money::from_cents(99900));
        form.remove_line(2);
        assert_eq!(form.total(), Money::from_cents(99900));

        form.set_custom_price(false);
        assert_eq!(form.total(), Money::from_cents(25000));
    }

    #[test]
    fn test_manual_total_refused_without_override() {
        let mut form = two_lines();
        let err = form.set_total(Money::from_cents(1)).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(form.total(), Money::from_cents(25000));
    }

    #[test]
    fn test_negative_custom_total_refused() {
        let mut form = two_lines();
        form.set_custom_price(true);
        assert!(form.set_total_input("-3").is_err());
        assert!(form.set_total_input("abc").is_err());
        assert_eq!(form.set_total_input("120.50").unwrap(), Money::from_cents(12050));
    }

    #[test]
    fn test_remove_recomputes() {
        let mut form = two_lines();
        assert!(form.remove_line(5).is_none());
        form.remove_line(0);
        assert_eq!(form.total(), Money::from_cents(15000));
        form.clear_lines();
        assert_eq!(form.total(), Money::zero());
    }

    #[test]
    fn test_from_appointment_keeps_custom_total() {
        let mut appt = Appointment::default();
        appt.services = vec![CabinetService::new("Consultation", Money::from_cents(10000))];
        appt.is_custom_price = true;
        appt.total_amount = Money::from_cents(7000);
        let form = PricingForm::from_appointment(&appt).unwrap();
        assert_eq!(form.total(), Money::from_cents(7000));

        appt.is_custom_price = false;
        let form = PricingForm::from_appointment(&appt).unwrap();
        assert_eq!(form.total(), Money::from_cents(10000));

        let mut target = Appointment::default();
        form.apply_to(&mut target);
        assert_eq!(target.total_amount, Money::from_cents(10000));
        assert!(!target.is_custom_price);
    }

    #[test]
    fn test_negative_line_refused() {
        let mut form = two_lines();
        let err = form
            .add_line(LineItem::new("Refund", Money::from_cents(-30000)))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(form.lines().len(), 2);
        assert_eq!(form.total(), Money::from_cents(25000));
    }

    #[test]
    fn test_overflowing_line_refused() {
        let mut form = two_lines();
        assert!(form
            .add_line(LineItem::new("Huge", Money::from_cents(i64::MAX)))
            .is_err());
        assert_eq!(form.lines().len(), 2);
        assert_eq!(form.total(), Money::from_cents(25000));
    }

    #[test]
    fn test_for_services_sums_catalog_prices() {
        let services = vec![
            CabinetService::new("Consultation", Money::from_cents(10000)),
            CabinetService::new("Cleaning", Money::from_cents(15000)),
        ];
        let form = PricingForm::for_services(&services).unwrap();
        assert_eq!(form.total(), Money::from_cents(25000));
        assert!(!form.is_custom_price());

        let bad = vec![CabinetService::new("Refund", Money::from_cents(-1))];
        assert!(PricingForm::for_services(&bad).is_err());
    }
}
