use crate::services::Keyboard;
use crate::texts::buttons::*;

pub const RENT_SELL: Keyboard = Keyboard::Choices(&[&[RENT, SELL]]);

pub const PROPERTY_USE: Keyboard = Keyboard::Choices(&[
    &[RESIDENCE, SHOP],
    &[OFFICE, CAFE],
    &[WAREHOUSE, OTHER],
]);

pub const HOUSE_TYPE: Keyboard = Keyboard::Choices(&[
    &[TRADITIONAL, CONDOMINIUM],
    &[APARTMENT, COMPOUND_VILLA],
]);

pub const ROOMS: Keyboard = Keyboard::Choices(&[
    &[SINGLE_ROOM, ONE_BEDROOM],
    &[TWO_BEDROOM, THREE_BEDROOM],
    &[MORE_THAN_THREE],
]);

pub const AREA: Keyboard = Keyboard::Choices(&[
    &[AREA_SMALL, AREA_16_25],
    &[AREA_26_50, AREA_51_75],
    &[AREA_76_110, AREA_LARGE],
]);

pub const PREVIEW_ONLY: Keyboard = Keyboard::Choices(&[&[PREVIEW]]);

pub const CONFIRM_CANCEL: Keyboard = Keyboard::Choices(&[&[CONFIRM, CANCEL]]);

pub const SHARE_CONTACT_REQUEST: Keyboard = Keyboard::RequestContact(SHARE_CONTACT);
