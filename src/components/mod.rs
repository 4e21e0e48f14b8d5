pub mod zone_map;
