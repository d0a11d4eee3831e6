//! Fixtures for repository tests: an in-memory database and parent rows
//! that satisfy foreign keys.

use sqlx::SqlitePool;

use pawhub_app::ports::{AnimalRepository, DeviceRepository, SubscriptionRepository, UserRepository};
use pawhub_domain::animal::{Animal, AnimalType};
use pawhub_domain::device::Device;
use pawhub_domain::subscription::{Subscription, SubscriptionPlan};
use pawhub_domain::user::{User, UserRole};

use crate::pool::Config;
use crate::{
    SqliteAnimalRepository, SqliteDeviceRepository, SqliteSubscriptionRepository,
    SqliteUserRepository,
};

pub async fn pool() -> SqlitePool {
    Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .unwrap()
    .pool()
    .clone()
}

pub async fn user(pool: &SqlitePool, username: &str, role: UserRole) -> User {
    let user = User::builder()
        .username(username)
        .email(format!("{username}@example.com"))
        .role(role)
        .password_hash("hash")
        .build()
        .unwrap();
    SqliteUserRepository::new(pool.clone())
        .create(user)
        .await
        .unwrap()
}

pub async fn animal(pool: &SqlitePool, volunteer: &User) -> Animal {
    let animal = Animal::builder()
        .name("Buddy")
        .age(3)
        .breed("Labrador")
        .animal_type(AnimalType::Dog)
        .volunteer_id(volunteer.id)
        .build()
        .unwrap();
    SqliteAnimalRepository::new(pool.clone())
        .create(animal)
        .await
        .unwrap()
}

pub async fn device(pool: &SqlitePool, owner: &User, serial: &str) -> Device {
    let device = Device::builder()
        .serial_number(serial)
        .name("Feeder")
        .owner_id(owner.id)
        .limits(100, 100)
        .build()
        .unwrap();
    SqliteDeviceRepository::new(pool.clone())
        .create(device)
        .await
        .unwrap()
}

pub async fn subscription(pool: &SqlitePool, holder: &User) -> Subscription {
    SqliteSubscriptionRepository::new(pool.clone())
        .create(Subscription::start(holder.id, SubscriptionPlan::Basic))
        .await
        .unwrap()
}
