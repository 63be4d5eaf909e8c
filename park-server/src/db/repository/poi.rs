//! Point of Interest Repository
//!
//! Owns the poi rows, their coordinate rings and the symmetric
//! related-POI association. Composite mutations (scalar replace +
//! coordinate replace + relation delta) run inside a single transaction,
//! so a failed step leaves nothing half-applied.

use sqlx::{SqliteConnection, SqlitePool};
use std::collections::BTreeSet;
use uuid::Uuid;

use shared::models::{Category, Coordinate, PoiData, PointOfInterest, TargetGroup};

use super::{RepoError, RepoResult};
use crate::poi::filter::PoiFilter;
use crate::poi::relations;
use crate::utils::time::current_time_hhmm;

/// Raw poi row; tags are stored as a JSON array string
#[derive(Debug, sqlx::FromRow)]
struct PoiRow {
    id: String,
    name: String,
    category: String,
    image: String,
    description: String,
    tags: String,
    target_group: String,
    required_min_length: i64,
    poi_opens_doors_at: String,
    poi_closes_doors_at: String,
    current_queue_length: i64,
}

impl PoiRow {
    fn into_poi(self) -> RepoResult<PointOfInterest> {
        let category: Category = self
            .category
            .parse()
            .map_err(|e| RepoError::Database(format!("corrupt poi row {}: {e}", self.id)))?;
        let target_group: TargetGroup = self
            .target_group
            .parse()
            .map_err(|e| RepoError::Database(format!("corrupt poi row {}: {e}", self.id)))?;
        let tags: Vec<String> = serde_json::from_str(&self.tags)
            .map_err(|e| RepoError::Database(format!("corrupt tags on poi {}: {e}", self.id)))?;

        Ok(PointOfInterest {
            id: self.id,
            name: self.name,
            category,
            image: self.image,
            description: self.description,
            tags,
            target_group,
            required_min_length: self.required_min_length,
            poi_opens_doors_at: self.poi_opens_doors_at,
            poi_closes_doors_at: self.poi_closes_doors_at,
            current_queue_length: self.current_queue_length,
            coordinates: Vec::new(),
            related_poi: Vec::new(),
            relating_to_poi: Vec::new(),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CoordinateRow {
    ring_index: i64,
    x: f64,
    y: f64,
}

/// Create a new POI. The queue length always starts at 0 regardless of
/// input; coordinate rows come from the payload rings and relation links
/// are established after verifying every referenced id exists.
/// A missing related id aborts the transaction; nothing is persisted.
pub async fn create(pool: &SqlitePool, data: PoiData) -> RepoResult<PointOfInterest> {
    let id = Uuid::new_v4().to_string();
    let related = relations::sanitize_desired(&id, data.category, &data.related_poi_ids);

    let mut tx = pool.begin().await?;

    let tags_json = serde_json::to_string(&data.tags)
        .map_err(|e| RepoError::Database(format!("Failed to encode tags: {e}")))?;
    sqlx::query(
        "INSERT INTO point_of_interest \
         (id, name, category, image, description, tags, target_group, \
          required_min_length, poi_opens_doors_at, poi_closes_doors_at, \
          current_queue_length) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0)",
    )
    .bind(&id)
    .bind(&data.name)
    .bind(data.category.as_str())
    .bind(&data.image)
    .bind(&data.description)
    .bind(&tags_json)
    .bind(data.target_group.as_str())
    .bind(data.required_min_length)
    .bind(&data.poi_opens_doors_at)
    .bind(&data.poi_closes_doors_at)
    .execute(&mut *tx)
    .await?;

    replace_coordinates(&mut *tx, &id, &data.coordinates).await?;

    for other in &related {
        ensure_exists(&mut *tx, other).await?;
        connect(&mut *tx, &id, other).await?;
    }

    tx.commit().await?;

    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database(format!("Failed to create point of interest {id}")))
}

/// Fetch one POI with both relation views populated; every related record
/// carries its own coordinates but no further relation expansion.
pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<PointOfInterest>> {
    let row: Option<PoiRow> = sqlx::query_as("SELECT * FROM point_of_interest WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let Some(row) = row else {
        return Ok(None);
    };

    let mut poi = row.into_poi()?;
    poi.coordinates = load_coordinates(pool, id).await?;

    let forward: Vec<String> =
        sqlx::query_scalar("SELECT related_id FROM poi_relation WHERE poi_id = ? ORDER BY related_id")
            .bind(id)
            .fetch_all(pool)
            .await?;
    let reverse: Vec<String> =
        sqlx::query_scalar("SELECT poi_id FROM poi_relation WHERE related_id = ? ORDER BY poi_id")
            .bind(id)
            .fetch_all(pool)
            .await?;

    poi.related_poi = load_summaries(pool, &forward).await?;
    poi.relating_to_poi = load_summaries(pool, &reverse).await?;

    Ok(Some(poi))
}

/// List POIs matching the filter predicate, each with its own coordinates
/// only. Relation views are expanded on detail fetches, not here.
pub async fn find_all(pool: &SqlitePool, filter: &PoiFilter) -> RepoResult<Vec<PointOfInterest>> {
    let rows: Vec<PoiRow> = sqlx::query_as("SELECT * FROM point_of_interest ORDER BY name")
        .fetch_all(pool)
        .await?;

    let now = current_time_hhmm();
    let mut pois = Vec::new();
    for row in rows {
        let mut poi = row.into_poi()?;
        if !filter.matches(&poi, &now) {
            continue;
        }
        poi.coordinates = load_coordinates(pool, &poi.id).await?;
        pois.push(poi);
    }
    Ok(pois)
}

/// Full replacement edit: scalars, coordinate rings (delete-all-then-insert)
/// and the relation delta, all in one transaction. Editing the category away
/// from ATTRACTION clears every relation link as part of the same edit.
pub async fn update(pool: &SqlitePool, id: &str, data: PoiData) -> RepoResult<PointOfInterest> {
    let desired = relations::sanitize_desired(id, data.category, &data.related_poi_ids);

    let mut tx = pool.begin().await?;

    let tags_json = serde_json::to_string(&data.tags)
        .map_err(|e| RepoError::Database(format!("Failed to encode tags: {e}")))?;
    let result = sqlx::query(
        "UPDATE point_of_interest SET \
         name = ?, category = ?, image = ?, description = ?, tags = ?, \
         target_group = ?, required_min_length = ?, poi_opens_doors_at = ?, \
         poi_closes_doors_at = ? \
         WHERE id = ?",
    )
    .bind(&data.name)
    .bind(data.category.as_str())
    .bind(&data.image)
    .bind(&data.description)
    .bind(&tags_json)
    .bind(data.target_group.as_str())
    .bind(data.required_min_length)
    .bind(&data.poi_opens_doors_at)
    .bind(&data.poi_closes_doors_at)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Point of Interest {id} not found"
        )));
    }

    replace_coordinates(&mut *tx, id, &data.coordinates).await?;

    // The delta is computed against the forward view only: links this POI
    // itself initiated. Disconnects remove the stored edge in either
    // direction so the other side stops seeing us too.
    let current: Vec<String> =
        sqlx::query_scalar("SELECT related_id FROM poi_relation WHERE poi_id = ?")
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;
    let delta = relations::reconcile(id, &current, &desired);

    for other in &delta.to_connect {
        ensure_exists(&mut *tx, other).await?;
        connect(&mut *tx, id, other).await?;
    }
    for other in &delta.to_disconnect {
        disconnect(&mut *tx, id, other).await?;
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Point of Interest {id} not found")))
}

/// Delete a POI. Foreign keys cascade the removal to its coordinate rows
/// and to every relation edge touching it, in both directions.
pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM point_of_interest WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Point of Interest {id} not found"
        )));
    }
    Ok(())
}

/// Scalar-only queue mutation, used by the queue randomizer.
pub async fn set_queue_length(pool: &SqlitePool, id: &str, minutes: i64) -> RepoResult<()> {
    let result = sqlx::query("UPDATE point_of_interest SET current_queue_length = ? WHERE id = ?")
        .bind(minutes)
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Point of Interest {id} not found"
        )));
    }
    Ok(())
}

/// Minimal `(id, current_queue_length)` projection for the randomizer.
pub async fn queue_projection(pool: &SqlitePool) -> RepoResult<Vec<(String, i64)>> {
    let rows: Vec<(String, i64)> =
        sqlx::query_as("SELECT id, current_queue_length FROM point_of_interest")
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

/// Deduplicated, sorted tag set over all POIs (filter-UI population).
pub async fn list_distinct_tags(pool: &SqlitePool) -> RepoResult<Vec<String>> {
    let rows: Vec<String> = sqlx::query_scalar("SELECT tags FROM point_of_interest")
        .fetch_all(pool)
        .await?;

    let mut set = BTreeSet::new();
    for raw in rows {
        let tags: Vec<String> = serde_json::from_str(&raw)
            .map_err(|e| RepoError::Database(format!("corrupt tags column: {e}")))?;
        set.extend(tags);
    }
    Ok(set.into_iter().collect())
}

// ========== Internal helpers ==========

async fn ensure_exists(conn: &mut SqliteConnection, id: &str) -> RepoResult<()> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM point_of_interest WHERE id = ?)")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    if !exists {
        return Err(RepoError::NotFound(format!(
            "Related Point of Interest {id} not found"
        )));
    }
    Ok(())
}

async fn connect(conn: &mut SqliteConnection, poi_id: &str, related_id: &str) -> RepoResult<()> {
    sqlx::query("INSERT OR IGNORE INTO poi_relation (poi_id, related_id) VALUES (?, ?)")
        .bind(poi_id)
        .bind(related_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Remove the edge regardless of which direction holds it. Disconnecting
/// an id that is not linked is a no-op, not an error.
async fn disconnect(conn: &mut SqliteConnection, poi_id: &str, related_id: &str) -> RepoResult<()> {
    sqlx::query(
        "DELETE FROM poi_relation \
         WHERE (poi_id = ? AND related_id = ?) OR (poi_id = ? AND related_id = ?)",
    )
    .bind(poi_id)
    .bind(related_id)
    .bind(related_id)
    .bind(poi_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Delete-all-then-insert; coordinate rows are never patched in place.
async fn replace_coordinates(
    conn: &mut SqliteConnection,
    poi_id: &str,
    rings: &[Vec<Coordinate>],
) -> RepoResult<()> {
    sqlx::query("DELETE FROM coordinate WHERE poi_id = ?")
        .bind(poi_id)
        .execute(&mut *conn)
        .await?;

    for (ring_index, ring) in rings.iter().enumerate() {
        for (point_index, point) in ring.iter().enumerate() {
            sqlx::query(
                "INSERT INTO coordinate (poi_id, ring_index, point_index, x, y) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(poi_id)
            .bind(ring_index as i64)
            .bind(point_index as i64)
            .bind(point.poi_x_coordinate)
            .bind(point.poi_y_coordinate)
            .execute(&mut *conn)
            .await?;
        }
    }
    Ok(())
}

async fn load_coordinates(pool: &SqlitePool, poi_id: &str) -> RepoResult<Vec<Vec<Coordinate>>> {
    let rows: Vec<CoordinateRow> = sqlx::query_as(
        "SELECT ring_index, x, y FROM coordinate \
         WHERE poi_id = ? ORDER BY ring_index, point_index",
    )
    .bind(poi_id)
    .fetch_all(pool)
    .await?;

    let mut rings: Vec<Vec<Coordinate>> = Vec::new();
    let mut current_ring: Option<i64> = None;
    for row in rows {
        if current_ring != Some(row.ring_index) {
            rings.push(Vec::new());
            current_ring = Some(row.ring_index);
        }
        if let Some(ring) = rings.last_mut() {
            ring.push(Coordinate {
                poi_x_coordinate: row.x,
                poi_y_coordinate: row.y,
            });
        }
    }
    Ok(rings)
}

/// Load related POIs with their coordinates, relation views left empty.
async fn load_summaries(pool: &SqlitePool, ids: &[String]) -> RepoResult<Vec<PointOfInterest>> {
    let mut pois = Vec::with_capacity(ids.len());
    for id in ids {
        let row: Option<PoiRow> = sqlx::query_as("SELECT * FROM point_of_interest WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        // FK constraints keep the edges consistent, so a miss here means a
        // concurrent delete landed between the two reads; just skip it.
        let Some(row) = row else {
            continue;
        };
        let mut poi = row.into_poi()?;
        poi.coordinates = load_coordinates(pool, id).await?;
        pois.push(poi);
    }
    Ok(pois)
}
