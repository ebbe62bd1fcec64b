//! Typed backend client

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use super::resource::Resource;
use super::transport::{ApiRequest, ApiResponse, Method, Transport};
use crate::error::{CabinetError, CabinetResult};
use crate::models::{
    Appointment, AppointmentId, Invoice, InvoiceId, InvoicePaymentUpdate, Patient, PatientId,
    PaymentRequest,
};

/// Client for the cabinet REST backend
///
/// Every request carries the session's id token as a bearer token. Paths are
/// relative to the configured base URL.
pub struct ApiClient {
    transport: Box<dyn Transport>,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(transport: Box<dyn Transport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request and fail on non-2xx
    pub fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> CabinetResult<ApiResponse> {
        let mut request = ApiRequest::new(method, self.url(path)).bearer(self.token.as_deref());
        if let Some(body) = body {
            request = request.json(body);
        }
        self.transport.send(&request)?.error_for_status()
    }

    fn body<B: Serialize>(value: &B) -> CabinetResult<serde_json::Value> {
        Ok(serde_json::to_value(value)?)
    }

    pub fn get_json<T: DeserializeOwned>(&self, path: &str) -> CabinetResult<T> {
        let response = self.send(Method::Get, path, None)?;
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Fetch a collection; an empty or `null` body is an empty list
    fn get_list<T: DeserializeOwned>(&self, path: &str) -> CabinetResult<Vec<T>> {
        let response = self.send(Method::Get, path, None)?;
        let body = response.body.trim();
        if body.is_empty() || body == "null" {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(body)?)
    }

    /// Send a body and return the confirmation text
    fn send_text(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        fallback: &str,
    ) -> CabinetResult<String> {
        let response = self.send(method, path, body)?;
        let text = response.body.trim();
        Ok(if text.is_empty() {
            fallback.to_string()
        } else {
            text.trim_matches('"').to_string()
        })
    }

    pub fn list<R: Resource>(&self) -> CabinetResult<Vec<R>> {
        let records: Vec<R> = self.get_list(R::LIST_PATH)?;
        debug!(entity = %R::KIND, count = records.len(), "listed records");
        Ok(records)
    }

    pub fn get<R: Resource>(&self, id: &str) -> CabinetResult<R> {
        self.get_json(&R::item_path(id)).map_err(|e| match e {
            CabinetError::NotFound { .. } => CabinetError::NotFound {
                entity_type: R::KIND.as_str(),
                identifier: id.to_string(),
            },
            other => other,
        })
    }

    pub fn create<R: Resource>(&self, record: &R) -> CabinetResult<String> {
        self.send_text(
            Method::Post,
            R::CREATE_PATH,
            Some(Self::body(record)?),
            &format!("{} created", R::KIND),
        )
    }

    pub fn update<R: Resource>(&self, id: &str, record: &R) -> CabinetResult<String> {
        self.send_text(
            Method::Put,
            &R::item_path(id),
            Some(Self::body(record)?),
            &format!("{} updated", R::KIND),
        )
    }

    pub fn delete<R: Resource>(&self, id: &str) -> CabinetResult<String> {
        self.send_text(
            Method::Delete,
            &R::item_path(id),
            None,
            &format!("{} deleted", R::KIND),
        )
    }

    /// Patient by national identity card number
    pub fn patient_by_cin(&self, cin: &str) -> CabinetResult<Patient> {
        self.get_json(&format!("patients/cin/{}", cin))
            .map_err(|e| match e {
                CabinetError::NotFound { .. } => CabinetError::patient_not_found(cin),
                other => other,
            })
    }

    pub fn invoices_for_patient(&self, patient_id: &PatientId) -> CabinetResult<Vec<Invoice>> {
        self.get_list(&format!("invoices/patient/{}", patient_id))
    }

    pub fn appointments_for_patient(
        &self,
        patient_id: &PatientId,
    ) -> CabinetResult<Vec<Appointment>> {
        self.get_list(&format!("appointments/patient/{}", patient_id))
    }

    pub fn invoices_for_appointment(
        &self,
        appointment_id: &AppointmentId,
    ) -> CabinetResult<Vec<Invoice>> {
        self.get_list(&format!("appointments/{}/invoices", appointment_id))
    }

    /// Ask the backend to issue an invoice for an appointment
    pub fn generate_invoice(&self, appointment_id: &AppointmentId) -> CabinetResult<Invoice> {
        let response = self.send(
            Method::Post,
            &format!("appointments/{}/invoices", appointment_id),
            None,
        )?;
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Record a payment on an invoice
    pub fn pay_invoice(
        &self,
        invoice_id: &InvoiceId,
        payment: &PaymentRequest,
    ) -> CabinetResult<Invoice> {
        let response = self.send(
            Method::Put,
            &format!("invoices/{}/pay", invoice_id),
            Some(Self::body(payment)?),
        )?;
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Edit paid amount, method and used products of an invoice
    pub fn update_invoice_payment(
        &self,
        invoice_id: &InvoiceId,
        update: &InvoicePaymentUpdate,
    ) -> CabinetResult<String> {
        self.send_text(
            Method::Put,
            &format!("invoices/{}/payment", invoice_id),
            Some(Self::body(update)?),
            "Invoice payment updated",
        )
    }

    pub fn mark_appointment_paid(
        &self,
        appointment_id: &AppointmentId,
    ) -> CabinetResult<Appointment> {
        let response = self.send(
            Method::Put,
            &format!("appointments/{}/mark-paid", appointment_id),
            Some(json!({ "paymentStatus": "PAID" })),
        )?;
        Ok(serde_json::from_str(&response.body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::MockTransport;
    use crate::api::transport::Body;
    use crate::models::{Money, PaymentMethod};

    fn client(mock: &MockTransport) -> ApiClient {
        ApiClient::new(Box::new(mock.clone()), "http://test/api/").with_token("tok")
    }

    #[test]
    fn test_list_sends_bearer() {
        let mock = MockTransport::new();
        mock.on_json(
            Method::Get,
            "patients/",
            serde_json::json!([{"patientId": "p1", "name": "Amina", "CIN": "AB123"}]),
        );
        let patients: Vec<Patient> = client(&mock).list().unwrap();
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0].cin, "AB123");

        let sent = mock.last_request().unwrap();
        assert_eq!(sent.url, "http://test/api/patients/");
        assert_eq!(sent.bearer.as_deref(), Some("tok"));
    }

    #[test]
    fn test_empty_list_body() {
        let mock = MockTransport::new();
        mock.on(Method::Get, "api/invoices", 200, "");
        let invoices: Vec<Invoice> = client(&mock).list().unwrap();
        assert!(invoices.is_empty());
    }

    #[test]
    fn test_get_not_found_names_entity() {
        let mock = MockTransport::new();
        let err = client(&mock).get::<Invoice>("missing").unwrap_err();
        assert_eq!(err.to_string(), "Invoice not found: missing");
    }

    #[test]
    fn test_create_returns_message() {
        let mock = MockTransport::new();
        mock.on(Method::Post, "patients/add", 200, "Patient added successfully");
        let msg = client(&mock).create(&Patient::new("Amina", "AB123")).unwrap();
        assert_eq!(msg, "Patient added successfully");

        match mock.last_request().unwrap().body {
            Body::Json(body) => assert_eq!(body["CIN"], "AB123"),
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn test_pay_invoice() {
        let mock = MockTransport::new();
        mock.on_json(
            Method::Put,
            "invoices/i1/pay",
            serde_json::json!({"invoiceId": "i1", "totalAmount": 500, "paidAmount": 500, "invoiceStatus": "PAID"}),
        );
        let request = PaymentRequest {
            payment_amount: Money::from_cents(30000),
            payment_type: PaymentMethod::Cash,
        };
        let invoice = client(&mock).pay_invoice(&"i1".into(), &request).unwrap();
        assert!(invoice.is_paid());

        match mock.last_request().unwrap().body {
            Body::Json(body) => {
                assert_eq!(body["paymentAmount"], 300.0);
                assert_eq!(body["paymentType"], "CASH");
            }
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn test_generate_invoice_path() {
        let mock = MockTransport::new();
        mock.on_json(
            Method::Post,
            "appointments/a1/invoices",
            serde_json::json!({"invoiceId": "i9", "appointmentId": "a1"}),
        );
        let invoice = client(&mock).generate_invoice(&"a1".into()).unwrap();
        assert_eq!(invoice.id_display(), "i9");
    }

    #[test]
    fn test_server_error_surfaces() {
        let mock = MockTransport::new();
        mock.on(Method::Delete, "services/s1", 500, r#"{"message":"constraint violation"}"#);
        let err = client(&mock).delete::<crate::models::CabinetService>("s1").unwrap_err();
        assert_eq!(err.to_string(), "API error (500): constraint violation");
    }
}
