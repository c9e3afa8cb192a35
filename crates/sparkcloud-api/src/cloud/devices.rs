// Cloud API device endpoints
//
// Listing, per-device detail, function invocation and variable reads.
// All paths live under `/v1/devices`.

use tracing::debug;

use crate::auth::AccessToken;
use crate::cloud::client::CloudClient;
use crate::cloud::models::{DeviceInfo, DeviceSummary, FunctionCallResponse, VariableResponse};
use crate::error::Error;

impl CloudClient {
    /// List every device claimed by the account.
    ///
    /// `GET /v1/devices`
    pub async fn list_devices(&self, token: &AccessToken) -> Result<Vec<DeviceSummary>, Error> {
        let url = self.endpoint(&["v1", "devices"])?;
        debug!("listing devices");
        self.get(url, token).await
    }

    /// Fetch functions, variables and status of one device.
    ///
    /// `GET /v1/devices/{id}`
    ///
    /// The cloud waits on the device itself to answer, so this can stall for
    /// a long time when the device is offline.
    pub async fn get_device(&self, token: &AccessToken, device_id: &str) -> Result<DeviceInfo, Error> {
        let url = self.endpoint(&["v1", "devices", device_id])?;
        debug!(device_id, "fetching device detail");
        self.get(url, token).await
    }

    /// Invoke a function exposed by the device firmware.
    ///
    /// `POST /v1/devices/{id}/{function}` with form field `params` set to the
    /// comma-joined arguments.
    pub async fn call_function(
        &self,
        token: &AccessToken,
        device_id: &str,
        function: &str,
        args: &[&str],
    ) -> Result<FunctionCallResponse, Error> {
        let url = self.endpoint(&["v1", "devices", device_id, function])?;
        let params = args.join(",");
        debug!(device_id, function, params = %params, "calling device function");
        self.post_form(url, token, &[("params", params.as_str())]).await
    }

    /// Read a variable exposed by the device firmware.
    ///
    /// `GET /v1/devices/{id}/{variable}`
    pub async fn get_variable(
        &self,
        token: &AccessToken,
        device_id: &str,
        variable: &str,
    ) -> Result<VariableResponse, Error> {
        let url = self.endpoint(&["v1", "devices", device_id, variable])?;
        debug!(device_id, variable, "reading device variable");
        self.get(url, token).await
    }
}
