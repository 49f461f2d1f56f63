use async_trait::async_trait;
use skyport_shared::{PaymentReceipt, PaymentRequest};

use crate::repository::ServiceResult;
use crate::session::Session;

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Pay for a pending booking. On success the backend confirms the booking.
    async fn create_payment(
        &self,
        session: &Session,
        request: &PaymentRequest,
    ) -> ServiceResult<PaymentReceipt>;
}
