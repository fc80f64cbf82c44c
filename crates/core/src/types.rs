/// Character ids map onto a PostgreSQL BIGSERIAL.
pub type DbId = i64;
