//! Fixed agent profiles: one role per workflow responsibility.

/// A fixed role definition handed to the model as its persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentProfile {
    pub role: &'static str,
    pub goal: &'static str,
    pub backstory: &'static str,
}

impl AgentProfile {
    pub const fn new(role: &'static str, goal: &'static str, backstory: &'static str) -> Self {
        Self {
            role,
            goal,
            backstory,
        }
    }
}

/// The full roster of agent roles used by the planning workflow.
///
/// The request parser is part of the roster for parity with conversational
/// frontends, but the JSON API feeds the workflow structured input directly.
#[derive(Debug, Clone, Copy)]
pub struct AgentRoster {
    pub request_parser: AgentProfile,
    pub city_selector: AgentProfile,
    pub transport: AgentProfile,
    pub local_expert: AgentProfile,
    pub budget_manager: AgentProfile,
    pub budget_checker: AgentProfile,
    pub itinerary_planner: AgentProfile,
}

impl AgentRoster {
    pub const fn new() -> Self {
        Self {
            request_parser: AgentProfile::new(
                "Travel Request Parser",
                "Extract structured travel parameters from natural language requests",
                "An expert at understanding natural language travel requests. \
                 Skilled at identifying key information like budget, duration, interests, \
                 and constraints from conversational input. Known for asking clarifying \
                 questions when information is ambiguous or missing.",
            ),
            city_selector: AgentProfile::new(
                "City Selection Expert",
                "Identify affordable and realistic destinations based on constraints",
                "A budget-conscious travel consultant with expertise in affordable \
                 destinations and cost estimation. Expert at analyzing budgets and \
                 determining feasible destinations based on distance, accommodation costs, \
                 and local prices.",
            ),
            transport: AgentProfile::new(
                "Transportation Specialist",
                "Determine cost-effective and efficient transportation options",
                "A logistics expert specializing in travel transportation. Skilled at \
                 evaluating flights, trains, buses, and car rentals to optimize travel \
                 time and costs.",
            ),
            local_expert: AgentProfile::new(
                "Local Experience Consultant",
                "Recommend affordable and enriching local activities",
                "A travel enthusiast with extensive knowledge of local cultures, \
                 attractions, and activities. Expert at curating budget-friendly \
                 experiences that provide authentic insights.",
            ),
            budget_manager: AgentProfile::new(
                "Budget Manager",
                "Ensure trip components stay within budget while maximizing value",
                "A financial planner specializing in travel budgets. Skilled at \
                 allocating funds across transportation, accommodation, food, and \
                 activities.",
            ),
            budget_checker: AgentProfile::new(
                "Budget Compliance Checker",
                "Validate that plans adhere to budget constraints",
                "A meticulous budget compliance officer. Expert at scrutinizing travel \
                 plans to ensure expenses align with allocated budget.",
            ),
            itinerary_planner: AgentProfile::new(
                "Itinerary Planner",
                "Create detailed and cohesive travel itineraries",
                "An experienced itinerary planner with talent for organizing complex \
                 travel plans. Skilled at coordinating transportation, accommodation, \
                 activities, and downtime into seamless schedules.",
            ),
        }
    }
}

impl Default for AgentRoster {
    fn default() -> Self {
        Self::new()
    }
}
