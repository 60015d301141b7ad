//! Servicio de tokens QR
//!
//! Cada vehículo lleva impreso en su tarjeta un QR con la URL pública de
//! consulta. El servicio genera ese QR como PNG y lo devuelve embebido en
//! un data URI, listo para pintar en la tarjeta sin ninguna otra petición.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{GrayImage, Luma};
use qrcode::{Color, QrCode};
use uuid::Uuid;

use crate::utils::errors::{AppError, AppResult};

const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Token generado para una tarjeta
#[derive(Debug, Clone)]
pub struct EncodedToken {
    /// URL de consulta codificada dentro del QR
    pub url: String,
    /// PNG del QR como data URI
    pub data_uri: String,
}

/// Generador de tokens QR. La generación es determinista: la misma URL
/// produce siempre el mismo data URI.
#[derive(Debug, Clone)]
pub struct QrService {
    /// Píxeles por módulo del QR
    module_scale: u32,
    /// Módulos de margen blanco alrededor del símbolo
    quiet_zone: u32,
}

impl Default for QrService {
    fn default() -> Self {
        Self {
            module_scale: 8,
            quiet_zone: 4,
        }
    }
}

impl QrService {
    /// URL pública de consulta de un vehículo
    pub fn lookup_url(base_url: &str, id: Uuid) -> String {
        format!("{}/vehicles/{}", base_url.trim_end_matches('/'), id)
    }

    /// Genera el token de la tarjeta de un vehículo
    pub fn encode(&self, base_url: &str, id: Uuid) -> AppResult<EncodedToken> {
        let url = Self::lookup_url(base_url, id);
        let code = QrCode::new(url.as_bytes())
            .map_err(|e| AppError::Encoding(format!("QR encoding failed: {:?}", e)))?;

        let png = self.render_png(&code)?;
        let data_uri = format!("{}{}", DATA_URI_PREFIX, STANDARD.encode(&png));

        Ok(EncodedToken { url, data_uri })
    }

    fn render_png(&self, code: &QrCode) -> AppResult<Vec<u8>> {
        let modules = code.width() as u32;
        let colors = code.to_colors();
        let dimension = (modules + 2 * self.quiet_zone) * self.module_scale;

        let mut img = GrayImage::from_pixel(dimension, dimension, Luma([255u8]));
        for y in 0..modules {
            for x in 0..modules {
                if colors[(y * modules + x) as usize] != Color::Dark {
                    continue;
                }
                let origin_x = (x + self.quiet_zone) * self.module_scale;
                let origin_y = (y + self.quiet_zone) * self.module_scale;
                for dy in 0..self.module_scale {
                    for dx in 0..self.module_scale {
                        img.put_pixel(origin_x + dx, origin_y + dy, Luma([0u8]));
                    }
                }
            }
        }

        let mut buffer = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buffer, image::ImageFormat::Png)
            .map_err(|e| AppError::Encoding(format!("PNG encoding failed: {}", e)))?;

        Ok(buffer.into_inner())
    }
}
