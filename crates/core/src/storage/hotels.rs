//! Hotel storage operations

use rusqlite::{params, Connection};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_uuid, parse_uuid_opt, OptionalExt};
use crate::error::Result;
use crate::models::Hotel;

pub struct HotelStore<'a> {
    conn: &'a Connection,
}

const HOTEL_COLUMNS: &str =
    "id, name, slug, location, photo, is_active, chain_id, created_at, updated_at";

impl<'a> HotelStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new hotel
    #[instrument(skip(self, hotel), fields(name = %hotel.name))]
    pub fn create(&self, hotel: &Hotel) -> Result<()> {
        self.conn.execute(
            "INSERT INTO hotels (id, name, slug, location, photo, is_active, chain_id, \
             created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                hotel.id.to_string(),
                hotel.name,
                hotel.slug,
                hotel.location,
                hotel.photo,
                hotel.is_active as i32,
                hotel.chain_id.map(|c| c.to_string()),
                hotel.created_at.to_rfc3339(),
                hotel.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find hotel by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Hotel>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM hotels WHERE id = ?1", HOTEL_COLUMNS))?;

        let hotel = stmt
            .query_row(params![id.to_string()], Self::map_hotel)
            .optional()?;

        Ok(hotel)
    }

    /// Find hotel by name
    #[instrument(skip(self))]
    pub fn find_by_name(&self, name: &str) -> Result<Option<Hotel>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM hotels WHERE name = ?1",
            HOTEL_COLUMNS
        ))?;

        let hotel = stmt.query_row(params![name], Self::map_hotel).optional()?;

        Ok(hotel)
    }

    /// Find hotel by slug
    #[instrument(skip(self))]
    pub fn find_by_slug(&self, slug: &str) -> Result<Option<Hotel>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM hotels WHERE slug = ?1",
            HOTEL_COLUMNS
        ))?;

        let hotel = stmt.query_row(params![slug], Self::map_hotel).optional()?;

        Ok(hotel)
    }

    /// List all hotels, newest first
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<Hotel>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM hotels ORDER BY created_at DESC",
            HOTEL_COLUMNS
        ))?;

        let hotels = stmt
            .query_map([], Self::map_hotel)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(hotels)
    }

    /// List hotels belonging to a chain
    #[instrument(skip(self))]
    pub fn list_by_chain(&self, chain_id: Uuid) -> Result<Vec<Hotel>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM hotels WHERE chain_id = ?1 ORDER BY name",
            HOTEL_COLUMNS
        ))?;

        let hotels = stmt
            .query_map(params![chain_id.to_string()], Self::map_hotel)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(hotels)
    }

    /// Update a hotel
    #[instrument(skip(self, hotel), fields(hotel_id = %hotel.id))]
    pub fn update(&self, hotel: &Hotel) -> Result<()> {
        self.conn.execute(
            "UPDATE hotels SET name = ?1, location = ?2, photo = ?3, is_active = ?4, \
             chain_id = ?5, updated_at = ?6
             WHERE id = ?7",
            params![
                hotel.name,
                hotel.location,
                hotel.photo,
                hotel.is_active as i32,
                hotel.chain_id.map(|c| c.to_string()),
                hotel.updated_at.to_rfc3339(),
                hotel.id.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Whether a hotel name is taken, optionally ignoring one hotel
    pub fn name_exists(&self, name: &str, exclude: Option<Uuid>) -> Result<bool> {
        let count: i64 = match exclude {
            Some(id) => self.conn.query_row(
                "SELECT COUNT(*) FROM hotels WHERE name = ?1 AND id != ?2",
                params![name, id.to_string()],
                |row| row.get(0),
            )?,
            None => self.conn.query_row(
                "SELECT COUNT(*) FROM hotels WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )?,
        };
        Ok(count > 0)
    }

    /// Whether a slug is already taken
    pub fn slug_exists(&self, slug: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM hotels WHERE slug = ?1",
            params![slug],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Sibling ids for a hotel
    #[instrument(skip(self))]
    pub fn related_ids(&self, hotel_id: Uuid) -> Result<Vec<Uuid>> {
        let mut stmt = self.conn.prepare(
            "SELECT related_id FROM related_hotels WHERE hotel_id = ?1 ORDER BY related_id",
        )?;

        let ids = stmt
            .query_map(params![hotel_id.to_string()], |row| {
                parse_uuid(&row.get::<_, String>(0)?)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(ids)
    }

    /// Replace a hotel's sibling set
    #[instrument(skip(self, related), fields(count = related.len()))]
    pub fn replace_related(&self, hotel_id: Uuid, related: &[Uuid]) -> Result<()> {
        self.conn.execute(
            "DELETE FROM related_hotels WHERE hotel_id = ?1",
            params![hotel_id.to_string()],
        )?;

        let mut stmt = self
            .conn
            .prepare("INSERT INTO related_hotels (hotel_id, related_id) VALUES (?1, ?2)")?;
        for related_id in related {
            stmt.execute(params![hotel_id.to_string(), related_id.to_string()])?;
        }

        Ok(())
    }

    /// Clear a hotel's sibling set
    #[instrument(skip(self))]
    pub fn clear_related(&self, hotel_id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM related_hotels WHERE hotel_id = ?1",
            params![hotel_id.to_string()],
        )?;
        Ok(())
    }

    fn map_hotel(row: &rusqlite::Row<'_>) -> rusqlite::Result<Hotel> {
        Ok(Hotel {
            id: parse_uuid(&row.get::<_, String>(0)?)?,
            name: row.get(1)?,
            slug: row.get(2)?,
            location: row.get(3)?,
            photo: row.get(4)?,
            is_active: row.get::<_, i32>(5)? != 0,
            chain_id: parse_uuid_opt(row.get::<_, Option<String>>(6)?)?,
            created_at: parse_datetime(&row.get::<_, String>(7)?)?,
            updated_at: parse_datetime(&row.get::<_, String>(8)?)?,
        })
    }
}
