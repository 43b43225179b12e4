use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::bovino::Bovino;
use crate::models::historial_reproduccion::HistorialReproduccion;
use crate::utils::errors::AppError;

pub struct HistorialRepository {
    pool: PgPool,
}

impl HistorialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all_con_bovino(
        &self,
    ) -> Result<Vec<(HistorialReproduccion, Option<Bovino>)>, AppError> {
        let historiales = sqlx::query_as::<_, HistorialReproduccion>(
            "SELECT * FROM historiales_reproduccion ORDER BY fecha_evento DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut result = Vec::with_capacity(historiales.len());
        for historial in historiales {
            let bovino = self.find_bovino(historial.bovino_id).await?;
            result.push((historial, bovino));
        }

        Ok(result)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<HistorialReproduccion>, AppError> {
        let historial = sqlx::query_as::<_, HistorialReproduccion>(
            "SELECT * FROM historiales_reproduccion WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(historial)
    }

    pub async fn find_by_id_con_bovino(
        &self,
        id: Uuid,
    ) -> Result<Option<(HistorialReproduccion, Option<Bovino>)>, AppError> {
        let Some(historial) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let bovino = self.find_bovino(historial.bovino_id).await?;

        Ok(Some((historial, bovino)))
    }

    pub async fn create(
        &self,
        bovino_id: Uuid,
        fecha_evento: NaiveDate,
        tipo_evento: String,
        detalles: Option<String>,
    ) -> Result<HistorialReproduccion, AppError> {
        let id = Uuid::new_v4();

        let historial = sqlx::query_as::<_, HistorialReproduccion>(
            r#"
            INSERT INTO historiales_reproduccion (id, bovino_id, fecha_evento, tipo_evento, detalles, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(bovino_id)
        .bind(fecha_evento)
        .bind(tipo_evento)
        .bind(detalles)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(historial)
    }

    /// Actualizar con los valores ya combinados por el controller.
    /// Devuelve None si ninguna fila coincidió con el id.
    pub async fn update(
        &self,
        id: Uuid,
        bovino_id: Uuid,
        fecha_evento: NaiveDate,
        tipo_evento: String,
        detalles: Option<String>,
    ) -> Result<Option<HistorialReproduccion>, AppError> {
        let historial = sqlx::query_as::<_, HistorialReproduccion>(
            r#"
            UPDATE historiales_reproduccion
            SET bovino_id = $2, fecha_evento = $3, tipo_evento = $4, detalles = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(bovino_id)
        .bind(fecha_evento)
        .bind(tipo_evento)
        .bind(detalles)
        .fetch_optional(&self.pool)
        .await?;

        Ok(historial)
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM historiales_reproduccion WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn find_bovino(&self, id: Uuid) -> Result<Option<Bovino>, AppError> {
        let bovino = sqlx::query_as::<_, Bovino>("SELECT * FROM bovinos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(bovino)
    }
}
