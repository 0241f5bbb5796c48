//! Mock transport for isolating resource clients in tests.

use mockall::mock;
use serde_json::Value;

use crate::transport::{ApiRequest, ApiResult, Transport};

mock! {
    pub Transport {}

    impl Transport for Transport {
        fn send(&self, request: &ApiRequest) -> ApiResult<Value>;
    }
}
