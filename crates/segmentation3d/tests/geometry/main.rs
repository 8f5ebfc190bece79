mod conversion_scenarios;
mod geometry_string_round_trip;
mod rasterization_properties;
mod segment_copy;
