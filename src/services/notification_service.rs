//! Resumen de notificaciones para la campana de la barra de navegación

use crate::models::analytics::{CategoryCount, NotificationSummary};
use crate::models::notification::{Notification, NotificationCategory};

pub struct NotificationService;

impl NotificationService {
    /// No leídas totales y por categoría, lista ordenada de más reciente a más antigua
    pub fn summarize(notifications: &[Notification]) -> NotificationSummary {
        let mut items = notifications.to_vec();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let unread_by_category = [
            NotificationCategory::Trip,
            NotificationCategory::Order,
            NotificationCategory::System,
        ]
        .into_iter()
        .map(|category| CategoryCount {
            category,
            unread: items
                .iter()
                .filter(|n| n.category == category && !n.is_read)
                .count(),
        })
        .collect();

        NotificationSummary {
            unread: items.iter().filter(|n| !n.is_read).count(),
            unread_by_category,
            items,
        }
    }
}
