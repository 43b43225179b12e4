use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::bovino_dto::{BovinoFilters, BovinoResponse, UserResponse, ValorCaracteristicaResponse};
use crate::models::bovino::Bovino;
use crate::models::caracteristica::CaracteristicaGenetica;
use crate::models::historial_reproduccion::HistorialReproduccion;
use crate::models::raza::Raza;
use crate::models::user::User;
use crate::utils::errors::AppError;

// Fila plana del join valores/características
#[derive(Debug, sqlx::FromRow)]
struct ValorConCaracteristica {
    id: Uuid,
    valor: Decimal,
    caracteristica_id: Uuid,
    caracteristica_nombre: String,
    caracteristica_descripcion: Option<String>,
}

pub struct BovinoRepository {
    pool: PgPool,
}

impl BovinoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self, filters: &BovinoFilters) -> Result<Vec<Bovino>, AppError> {
        let mut query = QueryBuilder::new("SELECT * FROM bovinos");
        apply_filters(&mut query, filters);
        query.push(" ORDER BY created_at DESC");

        let bovinos = query
            .build_query_as::<Bovino>()
            .fetch_all(&self.pool)
            .await?;

        Ok(bovinos)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Bovino>, AppError> {
        let bovino = sqlx::query_as::<_, Bovino>("SELECT * FROM bovinos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(bovino)
    }

    pub async fn create(
        &self,
        edad: i32,
        peso: i32,
        precio: Decimal,
        ubicacion: Option<String>,
        imagen_url: Option<String>,
        raza_id: Option<Uuid>,
        vendedor_id: Uuid,
    ) -> Result<Bovino, AppError> {
        let id = Uuid::new_v4();

        let bovino = sqlx::query_as::<_, Bovino>(
            r#"
            INSERT INTO bovinos (id, edad, peso, precio, ubicacion, imagen_url, raza_id, vendedor_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(edad)
        .bind(peso)
        .bind(precio)
        .bind(ubicacion)
        .bind(imagen_url)
        .bind(raza_id)
        .bind(vendedor_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(bovino)
    }

    /// Actualizar con los valores ya combinados por el controller.
    /// Devuelve None si ninguna fila coincidió con el id.
    pub async fn update(
        &self,
        id: Uuid,
        edad: i32,
        peso: i32,
        precio: Decimal,
        ubicacion: Option<String>,
        imagen_url: Option<String>,
        raza_id: Option<Uuid>,
        vendedor_id: Uuid,
    ) -> Result<Option<Bovino>, AppError> {
        let bovino = sqlx::query_as::<_, Bovino>(
            r#"
            UPDATE bovinos
            SET edad = $2, peso = $3, precio = $4, ubicacion = $5, imagen_url = $6, raza_id = $7, vendedor_id = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(edad)
        .bind(peso)
        .bind(precio)
        .bind(ubicacion)
        .bind(imagen_url)
        .bind(raza_id)
        .bind(vendedor_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(bovino)
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM bovinos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Componer la vista hidratada de un bovino: raza, propietario (sin
    /// password), valores de características con su definición y el
    /// historial reproductivo.
    pub async fn hydrate(&self, bovino: Bovino) -> Result<BovinoResponse, AppError> {
        let raza = match bovino.raza_id {
            Some(raza_id) => {
                sqlx::query_as::<_, Raza>("SELECT * FROM razas WHERE id = $1")
                    .bind(raza_id)
                    .fetch_optional(&self.pool)
                    .await?
            }
            None => None,
        };

        let propietario = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(bovino.vendedor_id)
            .fetch_optional(&self.pool)
            .await?
            .map(UserResponse::from);

        let valores = self.find_valores(bovino.id).await?;

        let historial = sqlx::query_as::<_, HistorialReproduccion>(
            "SELECT * FROM historiales_reproduccion WHERE bovino_id = $1 ORDER BY fecha_evento DESC",
        )
        .bind(bovino.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(BovinoResponse::new(bovino, raza, propietario, valores, historial))
    }

    async fn find_valores(&self, bovino_id: Uuid) -> Result<Vec<ValorCaracteristicaResponse>, AppError> {
        let filas = sqlx::query_as::<_, ValorConCaracteristica>(
            r#"
            SELECT vc.id, vc.valor,
                   cg.id AS caracteristica_id,
                   cg.nombre AS caracteristica_nombre,
                   cg.descripcion AS caracteristica_descripcion
            FROM valores_caracteristicas vc
            JOIN caracteristicas_geneticas cg ON cg.id = vc.caracteristica_id
            WHERE vc.bovino_id = $1
            "#,
        )
        .bind(bovino_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(filas
            .into_iter()
            .map(|fila| ValorCaracteristicaResponse {
                id: fila.id,
                valor: fila.valor,
                caracteristica_asociada: CaracteristicaGenetica {
                    id: fila.caracteristica_id,
                    nombre: fila.caracteristica_nombre,
                    descripcion: fila.caracteristica_descripcion,
                },
            })
            .collect())
    }
}

/// Traducir los filtros opcionales a un predicado SQL conjuntivo.
///
/// Ambas cotas presentes producen BETWEEN inclusivo; una sola cota produce
/// >= o <=. La ubicación es un substring match sensible a mayúsculas.
fn apply_filters(query: &mut QueryBuilder<'_, Postgres>, filters: &BovinoFilters) {
    let mut started = false;

    fn sep(query: &mut QueryBuilder<'_, Postgres>, started: &mut bool) {
        if *started {
            query.push(" AND ");
        } else {
            query.push(" WHERE ");
            *started = true;
        }
    }

    if let Some(raza_id) = filters.raza_id {
        sep(query, &mut started);
        query.push("raza_id = ").push_bind(raza_id);
    }

    match (filters.peso_min, filters.peso_max) {
        (Some(min), Some(max)) => {
            sep(query, &mut started);
            query.push("peso BETWEEN ").push_bind(min).push(" AND ").push_bind(max);
        }
        (Some(min), None) => {
            sep(query, &mut started);
            query.push("peso >= ").push_bind(min);
        }
        (None, Some(max)) => {
            sep(query, &mut started);
            query.push("peso <= ").push_bind(max);
        }
        (None, None) => {}
    }

    match (filters.precio_min, filters.precio_max) {
        (Some(min), Some(max)) => {
            sep(query, &mut started);
            query.push("precio BETWEEN ").push_bind(min).push(" AND ").push_bind(max);
        }
        (Some(min), None) => {
            sep(query, &mut started);
            query.push("precio >= ").push_bind(min);
        }
        (None, Some(max)) => {
            sep(query, &mut started);
            query.push("precio <= ").push_bind(max);
        }
        (None, None) => {}
    }

    if let Some(ubicacion) = &filters.ubicacion {
        sep(query, &mut started);
        query.push("ubicacion LIKE ").push_bind(format!("%{}%", ubicacion));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_for(filters: &BovinoFilters) -> String {
        let mut query = QueryBuilder::new("SELECT * FROM bovinos");
        apply_filters(&mut query, filters);
        query.into_sql()
    }

    #[test]
    fn test_no_filters_imposes_no_constraint() {
        let sql = sql_for(&BovinoFilters::default());
        assert_eq!(sql, "SELECT * FROM bovinos");
    }

    #[test]
    fn test_both_weight_bounds_build_inclusive_range() {
        let filters = BovinoFilters {
            peso_min: Some(200),
            peso_max: Some(400),
            ..Default::default()
        };
        assert_eq!(
            sql_for(&filters),
            "SELECT * FROM bovinos WHERE peso BETWEEN $1 AND $2"
        );
    }

    #[test]
    fn test_single_bounds_use_gte_and_lte() {
        let solo_min = BovinoFilters {
            peso_min: Some(200),
            ..Default::default()
        };
        assert_eq!(sql_for(&solo_min), "SELECT * FROM bovinos WHERE peso >= $1");

        let solo_max = BovinoFilters {
            precio_max: Some(Decimal::new(350000, 2)),
            ..Default::default()
        };
        assert_eq!(sql_for(&solo_max), "SELECT * FROM bovinos WHERE precio <= $1");
    }

    #[test]
    fn test_filters_combine_with_and() {
        let filters = BovinoFilters {
            raza_id: Some(Uuid::new_v4()),
            peso_min: Some(200),
            peso_max: Some(400),
            precio_min: Some(Decimal::new(100000, 2)),
            ubicacion: Some("Córdoba".to_string()),
            ..Default::default()
        };
        assert_eq!(
            sql_for(&filters),
            "SELECT * FROM bovinos WHERE raza_id = $1 AND peso BETWEEN $2 AND $3 \
             AND precio >= $4 AND ubicacion LIKE $5"
        );
    }

    #[test]
    fn test_location_filter_is_case_sensitive_like() {
        let filters = BovinoFilters {
            ubicacion: Some("Norte".to_string()),
            ..Default::default()
        };
        let sql = sql_for(&filters);
        assert!(sql.contains("ubicacion LIKE $1"));
        assert!(!sql.contains("ILIKE"));
    }
}
