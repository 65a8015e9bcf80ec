use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use flightinfo_core::repository::FlightRepository;
use flightinfo_core::search::{FlightClause, FlightPredicate};
use flightinfo_core::{CoreError, CoreResult, FlightRecord, FlightStatus, NewFlight};

const SELECT_FLIGHTS: &str = r#"
    SELECT id, flight_number, airline, departure_airport, arrival_airport,
           departure_time, arrival_time, status, created_at, updated_at
    FROM flights
"#;

pub struct PostgresFlightRepository {
    pool: PgPool,
}

impl PostgresFlightRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct FlightRow {
    id: i64,
    flight_number: String,
    airline: String,
    departure_airport: String,
    arrival_airport: String,
    departure_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<FlightRow> for FlightRecord {
    type Error = CoreError;

    fn try_from(row: FlightRow) -> CoreResult<Self> {
        let status = row
            .status
            .parse::<FlightStatus>()
            .map_err(|e| CoreError::StorageError(format!("flight {}: {}", row.id, e)))?;

        Ok(FlightRecord {
            id: row.id,
            flight_number: row.flight_number,
            airline: row.airline,
            departure_airport: row.departure_airport,
            arrival_airport: row.arrival_airport,
            departure_time: row.departure_time,
            arrival_time: row.arrival_time,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_records(rows: Vec<FlightRow>) -> CoreResult<Vec<FlightRecord>> {
    rows.into_iter().map(FlightRecord::try_from).collect()
}

fn storage_error(err: sqlx::Error) -> CoreError {
    CoreError::StorageError(err.to_string())
}

/// Like `storage_error`, but reports unique violations as duplicate flight numbers.
fn write_error(err: sqlx::Error, flight_number: &str) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return CoreError::DuplicateFlightNumber(flight_number.to_string());
        }
    }
    storage_error(err)
}

fn push_clause(builder: &mut QueryBuilder<'_, Postgres>, clause: &FlightClause) {
    match clause {
        // strpos keeps the match literal; LIKE would treat % and _ as wildcards
        FlightClause::AirlineContains(needle) => {
            builder.push(" AND strpos(airline, ").push_bind(needle.clone()).push(") > 0");
        }
        FlightClause::DepartureAirport(code) => {
            builder.push(" AND departure_airport = ").push_bind(code.clone());
        }
        FlightClause::ArrivalAirport(code) => {
            builder.push(" AND arrival_airport = ").push_bind(code.clone());
        }
        FlightClause::DepartsAtOrAfter(from) => {
            builder.push(" AND departure_time >= ").push_bind(*from);
        }
        FlightClause::DepartsAtOrBefore(to) => {
            builder.push(" AND departure_time <= ").push_bind(*to);
        }
        FlightClause::Status(status) => {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
    }
}

#[async_trait]
impl FlightRepository for PostgresFlightRepository {
    async fn get(&self, id: i64) -> CoreResult<Option<FlightRecord>> {
        let sql = format!("{} WHERE id = $1", SELECT_FLIGHTS);
        let row = sqlx::query_as::<_, FlightRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        row.map(FlightRecord::try_from).transpose()
    }

    async fn list_all(&self) -> CoreResult<Vec<FlightRecord>> {
        let sql = format!("{} ORDER BY departure_time ASC, id ASC", SELECT_FLIGHTS);
        let rows = sqlx::query_as::<_, FlightRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        into_records(rows)
    }

    async fn insert(&self, flight: NewFlight) -> CoreResult<FlightRecord> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, FlightRow>(
            r#"
            INSERT INTO flights (flight_number, airline, departure_airport, arrival_airport,
                                 departure_time, arrival_time, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING id, flight_number, airline, departure_airport, arrival_airport,
                      departure_time, arrival_time, status, created_at, updated_at
            "#,
        )
        .bind(&flight.flight_number)
        .bind(&flight.airline)
        .bind(&flight.departure_airport)
        .bind(&flight.arrival_airport)
        .bind(flight.departure_time)
        .bind(flight.arrival_time)
        .bind(flight.status.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, &flight.flight_number))?;

        FlightRecord::try_from(row)
    }

    async fn update(&self, id: i64, flight: NewFlight) -> CoreResult<Option<FlightRecord>> {
        let row = sqlx::query_as::<_, FlightRow>(
            r#"
            UPDATE flights
            SET flight_number = $1, airline = $2, departure_airport = $3, arrival_airport = $4,
                departure_time = $5, arrival_time = $6, status = $7, updated_at = $8
            WHERE id = $9
            RETURNING id, flight_number, airline, departure_airport, arrival_airport,
                      departure_time, arrival_time, status, created_at, updated_at
            "#,
        )
        .bind(&flight.flight_number)
        .bind(&flight.airline)
        .bind(&flight.departure_airport)
        .bind(&flight.arrival_airport)
        .bind(flight.departure_time)
        .bind(flight.arrival_time)
        .bind(flight.status.as_str())
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, &flight.flight_number))?;

        row.map(FlightRecord::try_from).transpose()
    }

    async fn delete(&self, id: i64) -> CoreResult<bool> {
        let result = sqlx::query("DELETE FROM flights WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: i64) -> CoreResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM flights WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)
    }

    async fn search(&self, predicate: &FlightPredicate) -> CoreResult<Vec<FlightRecord>> {
        let mut builder = QueryBuilder::<Postgres>::new(SELECT_FLIGHTS);
        builder.push(" WHERE TRUE");
        for clause in predicate.clauses() {
            push_clause(&mut builder, clause);
        }
        builder.push(" ORDER BY departure_time ASC, id ASC");

        tracing::debug!("Flight search SQL: {}", builder.sql());

        let rows = builder
            .build_query_as::<FlightRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        into_records(rows)
    }
}
