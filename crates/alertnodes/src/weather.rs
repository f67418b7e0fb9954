use crate::http::{Geocoder, WeatherProvider};
use alertcore::{
    Coordinates, ExecutePayload, ExecutionContext, Node, NodeError, NodeHandler, NodeKind,
    NodeOutput,
};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Looks up the current temperature for the payload city and stores it in
/// the execution context
pub struct WeatherNode {
    geocoder: Arc<dyn Geocoder>,
    weather: Arc<dyn WeatherProvider>,
}

impl WeatherNode {
    pub fn new(geocoder: Arc<dyn Geocoder>, weather: Arc<dyn WeatherProvider>) -> Self {
        Self { geocoder, weather }
    }
}

/// Substitute `{lat}` and `{lon}` with six decimal places
pub fn render_endpoint(template: &str, at: Coordinates) -> String {
    template
        .replace("{lat}", &format!("{:.6}", at.latitude))
        .replace("{lon}", &format!("{:.6}", at.longitude))
}

#[async_trait]
impl NodeHandler for WeatherNode {
    fn kind(&self) -> NodeKind {
        NodeKind::WeatherLookup
    }

    fn description(&self) -> &str {
        "Fetches the current temperature for the form city"
    }

    async fn handle(
        &self,
        node: &Node,
        payload: &ExecutePayload,
        ctx: &mut ExecutionContext,
    ) -> Result<NodeOutput, NodeError> {
        let city = payload.form_data.city.as_str();
        if city.is_empty() {
            return Err(NodeError::MissingCity);
        }

        let template = node.data.metadata.api_endpoint.as_deref().ok_or_else(|| {
            NodeError::Configuration(format!("node {} has no apiEndpoint", node.id))
        })?;

        let location = self
            .geocoder
            .locate(city)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| NodeError::NoGeocodingResults(city.to_string()))?;

        let url = render_endpoint(template, location);
        let temperature = self.weather.current_temperature(&url).await?;
        tracing::debug!("Temperature in {} is {}°C", city, temperature);

        ctx.set_location(location);
        ctx.set_temperature(temperature);

        Ok(NodeOutput::new()
            .with_output("temperature", temperature)
            .with_output("location", city)
            .with_output(
                "coordinates",
                json!({ "latitude": location.latitude, "longitude": location.longitude }),
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_placeholders_are_replaced() {
        let url = render_endpoint(
            "https://api.open-meteo.com/v1/forecast?latitude={lat}&longitude={lon}&current_weather=true",
            Coordinates {
                latitude: -37.814,
                longitude: 144.96332,
            },
        );
        assert_eq!(
            url,
            "https://api.open-meteo.com/v1/forecast?latitude=-37.814000&longitude=144.963320&current_weather=true"
        );
    }
}
