use axum::extract::Multipart;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::bovino_dto::{BovinoFilters, BovinoForm, BovinoResponse};
use crate::models::bovino::Bovino;
use crate::repositories::bovino_repository::BovinoRepository;
use crate::services::upload_service::UploadStore;
use crate::utils::errors::{field_validation_error, AppError};
use crate::utils::validation::{validate_decimal, validate_int, validate_uuid};

const BOVINO_NO_ENCONTRADO: &str = "Bovino no encontrado";

// Valores del formulario ya convertidos a sus tipos de columna
struct CamposBovino {
    edad: i32,
    peso: i32,
    precio: Decimal,
    raza_id: Option<Uuid>,
    vendedor_id: Uuid,
}

pub struct BovinoController {
    repository: BovinoRepository,
    uploads: UploadStore,
}

impl BovinoController {
    pub fn new(pool: PgPool, uploads: UploadStore) -> Self {
        Self {
            repository: BovinoRepository::new(pool),
            uploads,
        }
    }

    pub async fn list(&self, filters: BovinoFilters) -> Result<Vec<BovinoResponse>, AppError> {
        let bovinos = self.repository.find_all(&filters).await?;

        let mut result = Vec::with_capacity(bovinos.len());
        for bovino in bovinos {
            result.push(self.repository.hydrate(bovino).await?);
        }

        Ok(result)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<BovinoResponse, AppError> {
        let bovino = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(BOVINO_NO_ENCONTRADO.to_string()))?;

        self.repository.hydrate(bovino).await
    }

    /// Crear un bovino a partir del formulario multipart.
    ///
    /// La imagen ya está en disco cuando se comprueban los campos: cualquier
    /// salida con error elimina primero el archivo para no dejar subidas
    /// huérfanas.
    pub async fn create(&self, multipart: Multipart) -> Result<Bovino, AppError> {
        let form = self.read_form(multipart).await?;

        if non_empty(&form.edad).is_none()
            || non_empty(&form.peso).is_none()
            || non_empty(&form.precio).is_none()
            || non_empty(&form.vendedor_id).is_none()
        {
            self.discard_upload(&form).await?;
            return Err(AppError::BadRequest(
                "Edad, peso, precio y vendedorId son requeridos.".to_string(),
            ));
        }

        let campos = match parse_campos(&form) {
            Ok(campos) => campos,
            Err(e) => {
                self.discard_upload(&form).await?;
                return Err(e);
            }
        };

        let imagen_url = form.imagen.as_ref().map(|imagen| imagen.public_url.clone());

        match self
            .repository
            .create(
                campos.edad,
                campos.peso,
                campos.precio,
                form.ubicacion.clone(),
                imagen_url,
                campos.raza_id,
                campos.vendedor_id,
            )
            .await
        {
            Ok(bovino) => Ok(bovino),
            Err(e) => {
                self.discard_upload(&form).await?;
                Err(e.into_bad_request())
            }
        }
    }

    /// Actualizar un bovino.
    ///
    /// Una imagen nueva reemplaza y elimina la anterior; el campo de texto
    /// `imagenUrl` vacío es la señal explícita de quitar la imagen actual,
    /// distinta de omitir el campo (que la deja intacta).
    pub async fn update(&self, id: Uuid, multipart: Multipart) -> Result<BovinoResponse, AppError> {
        let form = self.read_form(multipart).await?;

        let current = match self.repository.find_by_id(id).await {
            Ok(Some(bovino)) => bovino,
            Ok(None) => {
                self.discard_upload(&form).await?;
                return Err(AppError::NotFound(BOVINO_NO_ENCONTRADO.to_string()));
            }
            Err(e) => {
                self.discard_upload(&form).await?;
                return Err(e);
            }
        };

        let campos = match merge_campos(&form, &current) {
            Ok(campos) => campos,
            Err(e) => {
                self.discard_upload(&form).await?;
                return Err(e);
            }
        };

        let imagen_url = match decidir_imagen(&form) {
            ImagenAccion::Reemplazar(nueva) => {
                if let Some(anterior) = &current.imagen_url {
                    self.uploads.remove_public(anterior).await?;
                }
                Some(nueva)
            }
            ImagenAccion::Quitar => {
                if let Some(anterior) = &current.imagen_url {
                    self.uploads.remove_public(anterior).await?;
                }
                None
            }
            ImagenAccion::Mantener => current.imagen_url.clone(),
        };

        let ubicacion = form.ubicacion.clone().or_else(|| current.ubicacion.clone());

        let updated = match self
            .repository
            .update(
                id,
                campos.edad,
                campos.peso,
                campos.precio,
                ubicacion,
                imagen_url,
                campos.raza_id,
                campos.vendedor_id,
            )
            .await
        {
            Ok(updated) => updated,
            Err(e) => {
                self.discard_upload(&form).await?;
                return Err(e.into_bad_request());
            }
        };

        let Some(updated) = updated else {
            self.discard_upload(&form).await?;
            return Err(AppError::NotFound(
                "Bovino no encontrado o sin cambios".to_string(),
            ));
        };

        self.repository
            .hydrate(updated)
            .await
            .map_err(AppError::into_bad_request)
    }

    /// Eliminar un bovino y su imagen asociada.
    ///
    /// El archivo se elimina antes que la fila; una fila que desapareció por
    /// un borrado concurrente se reporta como not-found.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let bovino = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(BOVINO_NO_ENCONTRADO.to_string()))?;

        if let Some(imagen_url) = &bovino.imagen_url {
            self.uploads.remove_public(imagen_url).await?;
        }

        let eliminados = self.repository.delete(id).await?;
        if eliminados == 0 {
            return Err(AppError::NotFound(BOVINO_NO_ENCONTRADO.to_string()));
        }

        Ok(())
    }

    /// Leer el formulario multipart, guardando la imagen en disco al vuelo.
    /// Si la lectura falla a mitad, la imagen ya guardada se elimina.
    async fn read_form(&self, mut multipart: Multipart) -> Result<BovinoForm, AppError> {
        let mut form = BovinoForm::default();

        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(e) => {
                    self.discard_upload(&form).await?;
                    return Err(AppError::Upload(format!(
                        "Error leyendo el formulario: {}",
                        e
                    )));
                }
            };

            let Some(name) = field.name().map(|s| s.to_string()) else {
                continue;
            };

            if name == "imagen" && field.file_name().is_some() {
                let nueva = match self.uploads.save_field(field).await {
                    Ok(imagen) => imagen,
                    Err(e) => {
                        self.discard_upload(&form).await?;
                        return Err(e);
                    }
                };
                // Si llegan dos archivos solo se conserva el último.
                if let Some(anterior) = form.imagen.replace(nueva) {
                    self.uploads.remove(&anterior).await?;
                }
                continue;
            }

            let value = match field.text().await {
                Ok(value) => value,
                Err(e) => {
                    self.discard_upload(&form).await?;
                    return Err(AppError::Upload(format!(
                        "Error leyendo el campo {}: {}",
                        name, e
                    )));
                }
            };

            match name.as_str() {
                "edad" => form.edad = Some(value),
                "peso" => form.peso = Some(value),
                "precio" => form.precio = Some(value),
                "ubicacion" => form.ubicacion = Some(value),
                "razaId" => form.raza_id = Some(value),
                "vendedorId" => form.vendedor_id = Some(value),
                "imagenUrl" => form.imagen_url = Some(value),
                _ => {}
            }
        }

        Ok(form)
    }

    async fn discard_upload(&self, form: &BovinoForm) -> Result<(), AppError> {
        if let Some(imagen) = &form.imagen {
            self.uploads.remove(imagen).await?;
        }
        Ok(())
    }
}

// Qué hacer con la imagen en un update
#[derive(Debug, PartialEq)]
enum ImagenAccion {
    Reemplazar(String),
    Quitar,
    Mantener,
}

/// Un archivo nuevo reemplaza; `imagenUrl` vacío explícito quita la imagen;
/// el campo omitido la deja intacta. El archivo tiene prioridad sobre el
/// campo de texto.
fn decidir_imagen(form: &BovinoForm) -> ImagenAccion {
    if let Some(nueva) = &form.imagen {
        ImagenAccion::Reemplazar(nueva.public_url.clone())
    } else if form.imagen_url.as_deref() == Some("") {
        ImagenAccion::Quitar
    } else {
        ImagenAccion::Mantener
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_campos(form: &BovinoForm) -> Result<CamposBovino, AppError> {
    let edad = validate_int(non_empty(&form.edad).unwrap_or_default())
        .map_err(|e| field_validation_error("edad", e))?;
    let peso = validate_int(non_empty(&form.peso).unwrap_or_default())
        .map_err(|e| field_validation_error("peso", e))?;
    let precio = validate_decimal(non_empty(&form.precio).unwrap_or_default())
        .map_err(|e| field_validation_error("precio", e))?;
    let vendedor_id = validate_uuid(non_empty(&form.vendedor_id).unwrap_or_default())
        .map_err(|e| field_validation_error("vendedorId", e))?;
    let raza_id = match non_empty(&form.raza_id) {
        Some(value) => Some(validate_uuid(value).map_err(|e| field_validation_error("razaId", e))?),
        None => None,
    };

    Ok(CamposBovino {
        edad,
        peso,
        precio,
        raza_id,
        vendedor_id,
    })
}

// Campo presente en el formulario gana; ausente o vacío conserva el valor
// actual. La raza vacía explícita la desasocia.
fn merge_campos(form: &BovinoForm, current: &Bovino) -> Result<CamposBovino, AppError> {
    let edad = match non_empty(&form.edad) {
        Some(value) => validate_int(value).map_err(|e| field_validation_error("edad", e))?,
        None => current.edad,
    };
    let peso = match non_empty(&form.peso) {
        Some(value) => validate_int(value).map_err(|e| field_validation_error("peso", e))?,
        None => current.peso,
    };
    let precio = match non_empty(&form.precio) {
        Some(value) => validate_decimal(value).map_err(|e| field_validation_error("precio", e))?,
        None => current.precio,
    };
    let vendedor_id = match non_empty(&form.vendedor_id) {
        Some(value) => validate_uuid(value).map_err(|e| field_validation_error("vendedorId", e))?,
        None => current.vendedor_id,
    };
    let raza_id = match form.raza_id.as_deref().map(str::trim) {
        None => current.raza_id,
        Some("") => None,
        Some(value) => Some(validate_uuid(value).map_err(|e| field_validation_error("razaId", e))?),
    };

    Ok(CamposBovino {
        edad,
        peso,
        precio,
        raza_id,
        vendedor_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn form_base() -> BovinoForm {
        BovinoForm {
            edad: Some("3".to_string()),
            peso: Some("420".to_string()),
            precio: Some("1500.50".to_string()),
            vendedor_id: Some("550e8400-e29b-41d4-a716-446655440000".to_string()),
            ..Default::default()
        }
    }

    fn bovino_actual() -> Bovino {
        Bovino {
            id: Uuid::new_v4(),
            edad: 5,
            peso: 500,
            precio: Decimal::new(200000, 2),
            ubicacion: Some("Santa Fe".to_string()),
            imagen_url: Some("/uploads/imagen-1.png".to_string()),
            raza_id: Some(Uuid::new_v4()),
            vendedor_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_parse_campos_converts_form_values() {
        let campos = parse_campos(&form_base()).unwrap();
        assert_eq!(campos.edad, 3);
        assert_eq!(campos.peso, 420);
        assert_eq!(campos.precio.to_string(), "1500.50");
        assert!(campos.raza_id.is_none());
    }

    #[test]
    fn test_parse_campos_rejects_malformed_numbers() {
        let mut form = form_base();
        form.peso = Some("mucho".to_string());
        assert!(matches!(
            parse_campos(&form),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_merge_campos_keeps_current_values_for_absent_fields() {
        let current = bovino_actual();
        let campos = merge_campos(&BovinoForm::default(), &current).unwrap();
        assert_eq!(campos.edad, current.edad);
        assert_eq!(campos.peso, current.peso);
        assert_eq!(campos.raza_id, current.raza_id);
        assert_eq!(campos.vendedor_id, current.vendedor_id);
    }

    #[test]
    fn test_merge_campos_empty_raza_clears_association() {
        let current = bovino_actual();
        let form = BovinoForm {
            raza_id: Some(String::new()),
            ..Default::default()
        };
        let campos = merge_campos(&form, &current).unwrap();
        assert!(campos.raza_id.is_none());
    }

    #[test]
    fn test_decidir_imagen_new_file_replaces() {
        let form = BovinoForm {
            imagen: Some(crate::services::upload_service::StoredImage {
                disk_path: "public/uploads/imagen-2.png".into(),
                public_url: "/uploads/imagen-2.png".to_string(),
            }),
            // El archivo tiene prioridad aunque venga imagenUrl vacío
            imagen_url: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            decidir_imagen(&form),
            ImagenAccion::Reemplazar("/uploads/imagen-2.png".to_string())
        );
    }

    #[test]
    fn test_decidir_imagen_empty_field_is_explicit_removal() {
        let form = BovinoForm {
            imagen_url: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(decidir_imagen(&form), ImagenAccion::Quitar);
    }

    #[test]
    fn test_decidir_imagen_absent_field_keeps_current() {
        assert_eq!(decidir_imagen(&BovinoForm::default()), ImagenAccion::Mantener);

        // Un imagenUrl no vacío tampoco toca el archivo existente
        let form = BovinoForm {
            imagen_url: Some("/uploads/imagen-1.png".to_string()),
            ..Default::default()
        };
        assert_eq!(decidir_imagen(&form), ImagenAccion::Mantener);
    }

    #[test]
    fn test_non_empty_treats_blank_as_absent() {
        assert_eq!(non_empty(&Some("  ".to_string())), None);
        assert_eq!(non_empty(&None), None);
        assert_eq!(non_empty(&Some(" 42 ".to_string())), Some("42"));
    }
}
