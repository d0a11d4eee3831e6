//! Shared application state for axum handlers.

use std::sync::Arc;

use pawhub_app::ports::{Authenticator, Repositories, Storage};
use pawhub_app::services::adoption_service::AdoptionService;
use pawhub_app::services::animal_service::AnimalService;
use pawhub_app::services::device_service::DeviceService;
use pawhub_app::services::habit_service::HabitService;
use pawhub_app::services::notification_service::NotificationService;
use pawhub_app::services::payment_service::PaymentService;
use pawhub_app::services::role_service::RoleService;
use pawhub_app::services::subscription_service::SubscriptionService;
use pawhub_app::services::usage_log_service::UsageLogService;
use pawhub_app::services::user_service::UserService;

/// Application state shared across all axum handlers.
///
/// Generic over the storage backend and the authenticator to avoid dynamic
/// dispatch. `Clone` is implemented manually so the underlying types do not
/// need to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<S: Storage, A> {
    pub user_service: Arc<UserService<S::Users, A>>,
    pub role_service: Arc<RoleService<S::Roles>>,
    pub animal_service: Arc<AnimalService<S::Animals, S::Adoptions>>,
    pub adoption_service: Arc<AdoptionService<S::Adoptions, S::Animals>>,
    pub device_service: Arc<DeviceService<S::Devices, S::UsageLogs, S::Animals, S::Users>>,
    pub usage_log_service: Arc<UsageLogService<S::UsageLogs, S::Devices>>,
    pub habit_service: Arc<HabitService<S::Habits, S::Animals, S::Devices>>,
    pub notification_service: Arc<NotificationService<S::Notifications, S::Users>>,
    pub subscription_service: Arc<SubscriptionService<S::Subscriptions, S::Users>>,
    pub payment_service: Arc<PaymentService<S::Payments, S::Subscriptions>>,
    /// Shared secret expected in the `X-API-Key` header of device requests.
    pub device_api_key: Arc<str>,
}

impl<S: Storage, A> Clone for AppState<S, A> {
    fn clone(&self) -> Self {
        Self {
            user_service: Arc::clone(&self.user_service),
            role_service: Arc::clone(&self.role_service),
            animal_service: Arc::clone(&self.animal_service),
            adoption_service: Arc::clone(&self.adoption_service),
            device_service: Arc::clone(&self.device_service),
            usage_log_service: Arc::clone(&self.usage_log_service),
            habit_service: Arc::clone(&self.habit_service),
            notification_service: Arc::clone(&self.notification_service),
            subscription_service: Arc::clone(&self.subscription_service),
            payment_service: Arc::clone(&self.payment_service),
            device_api_key: Arc::clone(&self.device_api_key),
        }
    }
}

impl<S, A> AppState<S, A>
where
    S: Storage,
    A: Authenticator + Send + Sync + 'static,
{
    /// Wire every service from one set of repositories.
    ///
    /// Services that touch several tables receive clones of the same
    /// repositories, so they all see the same rows.
    pub fn new(
        repos: Repositories<S>,
        authenticator: A,
        device_api_key: impl Into<Arc<str>>,
    ) -> Self {
        let Repositories {
            users,
            roles,
            animals,
            adoptions,
            devices,
            usage_logs,
            habits,
            notifications,
            subscriptions,
            payments,
        } = repos;

        Self {
            user_service: Arc::new(UserService::new(users.clone(), authenticator)),
            role_service: Arc::new(RoleService::new(roles)),
            animal_service: Arc::new(AnimalService::new(animals.clone(), adoptions.clone())),
            adoption_service: Arc::new(AdoptionService::new(adoptions, animals.clone())),
            device_service: Arc::new(DeviceService::new(
                devices.clone(),
                usage_logs.clone(),
                animals.clone(),
                users.clone(),
            )),
            usage_log_service: Arc::new(UsageLogService::new(usage_logs, devices.clone())),
            habit_service: Arc::new(HabitService::new(habits, animals, devices)),
            notification_service: Arc::new(NotificationService::new(notifications, users.clone())),
            subscription_service: Arc::new(SubscriptionService::new(subscriptions.clone(), users)),
            payment_service: Arc::new(PaymentService::new(payments, subscriptions)),
            device_api_key: device_api_key.into(),
        }
    }
}
