//! Контракты данных между сервером и клиентской частью формы объекта.
//!
//! Здесь живут только типы, которые пересекают границу сервер/клиент:
//! встроенная в страницу таблица подтипов и JSON массового удаления фото.

pub mod domain;
