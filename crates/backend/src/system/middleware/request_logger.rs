use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::shared::format::{format_elapsed, format_number};

/// Middleware для логирования HTTP запросов
///
/// Пишет одну строку на запрос: статус, метод, путь с query,
/// длительность и размер ответа. Ответы 5xx идут уровнем `error`,
/// 4xx уровнем `warn`.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();
    let status = parts.status.as_u16();

    // Читаем тело ответа, чтобы узнать реальный размер
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::error!(
                "{} {} {} | {} | body read failed: {}",
                status,
                method,
                uri,
                format_elapsed(start.elapsed()),
                e
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    let elapsed = format_elapsed(start.elapsed());
    let size = format_number(bytes.len());
    if parts.status.is_server_error() {
        tracing::error!("{} {} {} | {} | {} B", status, method, uri, elapsed, size);
    } else if parts.status.is_client_error() {
        tracing::warn!("{} {} {} | {} | {} B", status, method, uri, elapsed, size);
    } else {
        tracing::info!("{} {} {} | {} | {} B", status, method, uri, elapsed, size);
    }

    Response::from_parts(parts, Body::from(bytes))
}
