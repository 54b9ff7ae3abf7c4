use super::{required_str, ToolContext, WeatherTool};
use async_trait::async_trait;
use serde_json::Value;
use weather_core::format::current_weather_text;

pub struct CurrentWeatherTool;

#[async_trait]
impl WeatherTool for CurrentWeatherTool {
    fn name(&self) -> &str {
        "get_current_weather"
    }

    fn description(&self) -> &str {
        "Get current weather information for a specified city"
    }

    fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "City to fetch weather information for, e.g. 'Taipei'"
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
        Ok(Value::String(current_weather_text(&weather)))
    }
}
