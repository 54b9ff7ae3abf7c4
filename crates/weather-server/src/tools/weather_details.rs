use super::{required_str, ToolContext, WeatherTool};
use async_trait::async_trait;
use serde_json::Value;

pub struct WeatherDetailsTool;

#[async_trait]
impl WeatherTool for WeatherDetailsTool {
    fn name(&self) -> &str {
        "get_weather_details"
    }

    fn description(&self) -> &str {
        "Get detailed current weather for a city as structured JSON: temperature, humidity, \
         wind, precipitation, pressure, cloud cover, UV index and visibility"
    }

    fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "The name of the city to fetch weather information for"
                }
            },
            "required": ["city"]
        })
    }

    async fn call(&self, args: Value, ctx: &ToolContext) -> Result<Value, String> {
        let city = required_str(&args, "city")?;
        let weather = ctx
            .weather
            .current_weather(city, ctx.clock.now())
            .await
            .map_err(|e| e.to_string())?;
        serde_json::to_value(&weather).map_err(|e| e.to_string())
    }
}
