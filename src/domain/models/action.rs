use super::EndpointRequest;

pub enum Action {
    EndpointRequest(EndpointRequest),
}
