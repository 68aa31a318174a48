// Two security tiers: public (no auth) and protected (JWT bearer token, /api/*)
pub mod protected;
pub mod public;
