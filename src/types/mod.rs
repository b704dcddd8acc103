pub mod itinerary;
pub mod trip;

pub use itinerary::{AccommodationOption, DayPlan, ItineraryDocument};
pub use trip::{BudgetTier, TravelStyle, TripForm, TripSpecification, TripType};
