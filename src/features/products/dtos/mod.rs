pub mod product_dto;

pub use product_dto::{
    CreateProductDto, DeleteProductDto, DeleteProductResponseDto, ProductListViewDto,
    ProductViewDto, ProductViewQuery, QuickAddPresetDto,
};
