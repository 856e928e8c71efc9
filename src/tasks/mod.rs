//! Task templates - one prompt builder per workflow stage.
//!
//! Each builder renders the live trip state into a task description plus
//! the JSON shape the agent is expected to return. The expected output is
//! a natural-language hint to the model, not an enforced schema.

use crate::workflow::{StageResult, TripRequest};

/// A single unit of work for one agent: what to do and what shape to reply in.
#[derive(Debug, Clone)]
pub struct TaskSpec {
    pub description: String,
    pub expected_output: String,
}

impl TaskSpec {
    pub fn new(description: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            description: description.into().trim().to_string(),
            expected_output: expected_output.into().trim().to_string(),
        }
    }
}

/// Stage 1: pick an affordable destination for the request.
pub fn choose_city(request: &TripRequest) -> TaskSpec {
    let description = format!(
        "Analyze the user's budget and preferences to select an affordable and \
         realistic travel destination. Consider distance, accommodation costs, \
         and local prices.\n\n\
         - Interests: {interests}\n\
         - Budget: {budget} {currency}\n\
         - Duration: {duration} days\n\
         - Start city: {start_city}\n\
         - Season: {season}",
        interests = request.interests,
        budget = request.budget,
        currency = request.currency,
        duration = request.duration,
        start_city = request.start_city,
        season = request.season,
    );

    let expected_output = r#"{
    "destination_city": "string",
    "reasoning": "string"
}"#;

    TaskSpec::new(description, expected_output)
}

/// Stage 2: research the chosen city with a seasonal focus.
pub fn research_city(city: &str, request: &TripRequest) -> TaskSpec {
    let description = format!(
        "Research {city} with focus on:\n\
         - Top attractions and landmarks\n\
         - Local food and cuisine highlights\n\
         - Cultural experiences and seasonal events\n\
         - Local customs and etiquette\n\
         - Transportation and safety tips\n\
         - Tips for traveling in {season}",
        city = city,
        season = request.season,
    );

    let expected_output = r#"{
    "attractions": ["string"],
    "cuisine": ["string"],
    "cultural_norms": ["string"],
    "transportation_tips": ["string"],
    "local_activities": ["string"]
}"#;

    TaskSpec::new(description, expected_output)
}

/// Stage 3: evaluate transport to and within the destination.
pub fn plan_transport(request: &TripRequest, city: &str) -> TaskSpec {
    let description = format!(
        "Recommend best transportation options for trip from {start_city} to {city}.\n\n\
         Evaluate:\n\
         - Cost, convenience, travel time\n\
         - Long-distance travel to destination\n\
         - Local transportation within city",
        start_city = request.start_city,
        city = city,
    );

    let expected_output = r#"{
    "long_distance_options": ["string"],
    "local_transport_options": ["string"],
    "reasoning": "string"
}"#;

    TaskSpec::new(description, expected_output)
}

/// Stage 4: build the day-by-day itinerary from the research output.
pub fn plan_itinerary(request: &TripRequest, city: &str, city_info: &StageResult) -> TaskSpec {
    let description = format!(
        "Create a {duration}-day itinerary for {city}.\n\n\
         Constraints:\n\
         - Budget: {budget} {currency}\n\
         - Interests: {interests}\n\
         - Season: {season}\n\n\
         City Information:\n{city_info}\n\n\
         Plan must include:\n\
         - Transportation (to and within city)\n\
         - Accommodation suggestions\n\
         - Day-by-day activities and sightseeing\n\
         - Meal recommendations",
        duration = request.duration,
        city = city,
        budget = request.budget,
        currency = request.currency,
        interests = request.interests,
        season = request.season,
        city_info = city_info.to_json(),
    );

    let expected_output = r#"{
    "itinerary": [
        {
            "day": "integer",
            "activities": [
                {
                    "activity": "string",
                    "time": "string",
                    "location": "string",
                    "description": "string",
                    "transportation": "string"
                }
            ]
        }
    ]
}"#;

    TaskSpec::new(description, expected_output)
}

/// Stage 5: allocate the budget across all cost categories.
pub fn plan_budget(request: &TripRequest, city: &str, itinerary: &StageResult) -> TaskSpec {
    let description = format!(
        "Create a detailed budget for a {duration}-day trip for {people} people \
         from {start_city} to {city}. Max budget: {budget} {currency}.\n\n\
         Itinerary:\n{itinerary}\n\n\
         Include:\n\
         - Transport (round-trip + local)\n\
         - Accommodation\n\
         - Activities (with entry costs)\n\
         - Meals (all days)\n\
         - Emergency fund & visa fees\n\n\
         Requirements:\n\
         - Use approximate CURRENT prices\n\
         - Provide a clear JSON breakdown\n\
         - Validate total <= {budget}\n\
         - If over budget, suggest adjustments",
        duration = request.duration,
        people = request.people,
        start_city = request.start_city,
        city = city,
        budget = request.budget,
        currency = request.currency,
        itinerary = itinerary.to_json(),
    );

    let expected_output = r#"{
    "transportation": [...],
    "accommodation": [...],
    "activities": [...],
    "meals": [...],
    "emergency_fund": ...,
    "visa_fees": ...,
    "total_estimated_cost": ...
}"#;

    TaskSpec::new(description, expected_output)
}

/// Stage 6: verify the budget plan's arithmetic and compliance.
pub fn check_budget(request: &TripRequest, city: &str, budget_plan: &StageResult) -> TaskSpec {
    let description = format!(
        "Verify and validate the budget plan for a {duration}-day trip for \
         {people} people from {start_city} to {city}. \
         Budget: {budget} {currency}.\n\n\
         Check all categories (accommodation, transport, activities, meals, \
         visa, emergency). Return corrected totals if discrepancies found.\n\n\
         Budget Plan to Verify:\n{plan}",
        duration = request.duration,
        people = request.people,
        start_city = request.start_city,
        city = city,
        budget = request.budget,
        currency = request.currency,
        plan = budget_plan.to_json_pretty(),
    );

    let expected_output = format!(
        r#"{{
  "schema_version": "1.0",
  "currency": "{currency}",
  "verified_at": "ISO8601 timestamp",
  "categories": {{
    "accommodation": [...],
    "transportation": [...],
    "activities": [...],
    "meals": [...],
    "emergency_fund": {{...}},
    "visa_fees": {{...}}
  }},
  "computed_total": number,
  "original_total_in_plan": number,
  "discrepancy": number,
  "within_budget": boolean,
  "over_by": number,
  "flags": [...],
  "recommendations": [...]
}}"#,
        currency = request.currency,
    );

    TaskSpec::new(description, expected_output)
}
