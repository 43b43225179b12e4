//! Almacenamiento de imágenes subidas
//!
//! Valida y guarda las imágenes de los bovinos bajo el directorio público
//! de uploads, con nombres cualificados por timestamp para evitar
//! colisiones entre requests concurrentes. La validación comprueba tanto
//! el MIME declarado como la extensión del archivo.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use axum::extract::multipart::Field;
use chrono::Utc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::utils::errors::AppError;

/// Tamaño máximo de imagen aceptado (5 MiB)
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Prefijo público bajo el que se sirven las imágenes
pub const PUBLIC_PREFIX: &str = "/uploads";

const ALLOWED_EXTENSIONS: [&str; 4] = ["jpeg", "jpg", "png", "gif"];
const ALLOWED_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/gif"];

const INVALID_TYPE_MESSAGE: &str = "Solo se permiten archivos de imagen (jpeg, jpg, png, gif)";

/// Imagen ya escrita en disco, con su ruta pública `/uploads/...`
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub disk_path: PathBuf,
    pub public_url: String,
}

/// Almacén de imágenes con límites explícitos por instancia
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: u64,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Crear el directorio de uploads si no existe
    pub async fn ensure_dir(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::Internal(format!(
                "No se pudo crear el directorio de uploads {}: {}",
                self.dir.display(),
                e
            ))
        })
    }

    /// Guardar un campo de archivo multipart en disco.
    ///
    /// Valida tipo y extensión antes de escribir, y aplica el límite de
    /// tamaño durante la lectura; un archivo parcial nunca queda en disco
    /// tras un error.
    pub async fn save_field(&self, mut field: Field<'_>) -> Result<StoredImage, AppError> {
        let field_name = field.name().unwrap_or("imagen").to_string();
        let original_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(|s| s.to_string());

        let extension = validate_image(&original_name, content_type.as_deref())?;

        let filename = format!(
            "{}-{}.{}",
            field_name,
            Utc::now().timestamp_millis(),
            extension
        );
        let disk_path = self.dir.join(&filename);

        let mut file = fs::File::create(&disk_path).await.map_err(|e| {
            AppError::Internal(format!("No se pudo crear {}: {}", disk_path.display(), e))
        })?;

        let mut total: u64 = 0;
        loop {
            let chunk = match field.chunk().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(e) => {
                    drop(file);
                    let _ = fs::remove_file(&disk_path).await;
                    return Err(AppError::Upload(format!("Error leyendo la imagen: {}", e)));
                }
            };

            total += chunk.len() as u64;
            if total > self.max_bytes {
                drop(file);
                let _ = fs::remove_file(&disk_path).await;
                return Err(AppError::Upload(format!(
                    "La imagen supera el tamaño máximo de {} bytes",
                    self.max_bytes
                )));
            }

            if let Err(e) = file.write_all(&chunk).await {
                drop(file);
                let _ = fs::remove_file(&disk_path).await;
                return Err(AppError::Internal(format!(
                    "Error escribiendo {}: {}",
                    disk_path.display(),
                    e
                )));
            }
        }

        file.flush().await.map_err(|e| {
            AppError::Internal(format!("Error escribiendo {}: {}", disk_path.display(), e))
        })?;

        Ok(StoredImage {
            disk_path,
            public_url: format!("{}/{}", PUBLIC_PREFIX, filename),
        })
    }

    /// Eliminar una imagen recién guardada (limpieza tras un fallo).
    /// Un archivo ya ausente no es un error.
    pub async fn remove(&self, image: &StoredImage) -> Result<(), AppError> {
        match fs::remove_file(&image.disk_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Internal(format!(
                "No se pudo eliminar la imagen {}: {}",
                image.disk_path.display(),
                e
            ))),
        }
    }

    /// Eliminar la imagen referida por una ruta pública `/uploads/...`.
    ///
    /// Se comprueba la existencia primero: una referencia a un archivo ya
    /// ausente se tolera en silencio.
    pub async fn remove_public(&self, public_url: &str) -> Result<(), AppError> {
        // Solo el nombre de archivo; la ruta pública no debe poder escapar
        // del directorio de uploads.
        let filename = match public_url.rsplit('/').next() {
            Some(name) if !name.is_empty() => name,
            _ => return Ok(()),
        };
        let path = self.dir.join(filename);

        if fs::metadata(&path).await.is_err() {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            AppError::Internal(format!(
                "No se pudo eliminar la imagen {}: {}",
                path.display(),
                e
            ))
        })
    }
}

/// Validar nombre y MIME de una imagen; devuelve la extensión normalizada.
///
/// Ambas comprobaciones deben pasar, igual que el filtro de subida
/// original: extensión en {jpeg, jpg, png, gif} y MIME de imagen
/// correspondiente.
pub fn validate_image(file_name: &str, content_type: Option<&str>) -> Result<String, AppError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let extension_ok = ALLOWED_EXTENSIONS.contains(&extension.as_str());
    let mime_ok = content_type
        .map(|ct| ALLOWED_MIME_TYPES.contains(&ct))
        .unwrap_or(false);

    if extension_ok && mime_ok {
        Ok(extension)
    } else {
        Err(AppError::Upload(INVALID_TYPE_MESSAGE.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_image_accepts_allowed_types() {
        assert_eq!(validate_image("vaca.png", Some("image/png")).unwrap(), "png");
        assert_eq!(
            validate_image("toro.JPEG", Some("image/jpeg")).unwrap(),
            "jpeg"
        );
        assert_eq!(validate_image("t.gif", Some("image/gif")).unwrap(), "gif");
    }

    #[test]
    fn test_validate_image_rejects_bad_extension() {
        assert!(validate_image("notas.txt", Some("text/plain")).is_err());
        assert!(validate_image("vaca.bmp", Some("image/bmp")).is_err());
        assert!(validate_image("sin_extension", Some("image/png")).is_err());
    }

    #[test]
    fn test_validate_image_requires_both_checks() {
        // Extensión correcta pero MIME incorrecto
        assert!(validate_image("vaca.png", Some("text/plain")).is_err());
        // MIME correcto pero extensión incorrecta
        assert!(validate_image("vaca.txt", Some("image/png")).is_err());
        // Sin MIME declarado
        assert!(validate_image("vaca.png", None).is_err());
    }

    #[tokio::test]
    async fn test_remove_public_deletes_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path(), MAX_IMAGE_BYTES);
        let path = dir.path().join("imagen-123.png");
        tokio::fs::write(&path, b"png").await.unwrap();

        store.remove_public("/uploads/imagen-123.png").await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_remove_public_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path(), MAX_IMAGE_BYTES);

        assert!(store.remove_public("/uploads/no-existe.png").await.is_ok());
    }

    #[tokio::test]
    async fn test_remove_public_ignores_path_components() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path(), MAX_IMAGE_BYTES);
        let path = dir.path().join("imagen-9.png");
        tokio::fs::write(&path, b"png").await.unwrap();

        // La ruta pública solo aporta el nombre de archivo.
        store
            .remove_public("/uploads/../otra/imagen-9.png")
            .await
            .unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_remove_tolerates_missing_stored_image() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path(), MAX_IMAGE_BYTES);
        let stored = StoredImage {
            disk_path: dir.path().join("imagen-ausente.png"),
            public_url: "/uploads/imagen-ausente.png".to_string(),
        };

        assert!(store.remove(&stored).await.is_ok());
    }
}
