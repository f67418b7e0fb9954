//! Built-in node handlers
//!
//! One handler per node type, plus the service adapters the weather
//! lookup depends on.

mod condition;
mod email;
mod form;
mod http;
mod lifecycle;
mod weather;

pub use condition::{
    condition_message, evaluate_condition, ConditionNode, Operator, CONDITION_MET_TEXT,
    CONDITION_NOT_MET_TEXT,
};
pub use email::{render_template, EmailNode, RenderedEmail, DEFAULT_SENDER};
pub use form::{validate_form, FormNode};
pub use http::{
    decode_geocoding, decode_weather, Geocoder, OpenMeteoClient, OpenMeteoConfig,
    WeatherProvider, DEFAULT_GEOCODING_URL,
};
pub use lifecycle::{EndNode, StartNode};
pub use weather::{render_endpoint, WeatherNode};

use alertcore::NodeError;
use alertruntime::HandlerRegistry;
use std::sync::Arc;

/// Register the handlers that need no external services
pub fn register_local(registry: &mut HandlerRegistry) {
    registry.register(Arc::new(StartNode));
    registry.register(Arc::new(EndNode));
    registry.register(Arc::new(FormNode));
    registry.register(Arc::new(ConditionNode));
    registry.register(Arc::new(EmailNode::default()));
}

/// Register all standard handlers, with the weather lookup backed by `client`
pub fn register_all(registry: &mut HandlerRegistry, client: OpenMeteoClient) {
    register_local(registry);
    let client = Arc::new(client);
    registry.register(Arc::new(WeatherNode::new(client.clone(), client)));
}

/// Registry with every standard handler talking to Open-Meteo
pub fn default_registry(config: OpenMeteoConfig) -> Result<HandlerRegistry, NodeError> {
    let mut registry = HandlerRegistry::new();
    register_all(&mut registry, OpenMeteoClient::new(config)?);
    Ok(registry)
}
