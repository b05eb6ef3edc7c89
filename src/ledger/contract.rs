// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Estate Ledger contributors

//! PropertySale contract binding.

use alloy::sol;

use super::types::Listing;

// The PropertySale interface as deployed. The `PropertyListed` event is
// consumed to learn the id assigned to a fresh listing; `PropertySold`
// is emitted by the contract but not consumed here.
sol! {
    #[sol(rpc)]
    contract PropertySale {
        struct Property {
            string propertyAddress;
            uint256 price;
            address payable seller;
            address buyer;
            bool isSold;
            string title;
            string description;
        }

        event PropertyListed(uint256 indexed id, string propertyAddress, uint256 price, address seller, string title);
        event PropertySold(uint256 indexed id, address buyer, uint256 price);

        function listProperty(string _propertyAddress, uint256 _price, string _title, string _description) external;
        function buyProperty(uint256 _propertyId) external payable;
        function updatePrice(uint256 _propertyId, uint256 _newPrice) external;
        function getProperty(uint256 _propertyId) external view returns (string title, string description, string propertyAddress, uint256 price, address seller, address buyer, bool isSold);
        function getPropertiesCount() external view returns (uint256 count);
        function getUnsoldProperties() external view returns (Property[] memory listings);
    }
}

impl PropertySale::getPropertyReturn {
    /// Convert a `getProperty` result into the domain listing type.
    pub fn into_listing(self, id: u64) -> Listing {
        Listing {
            id,
            title: self.title,
            description: self.description,
            property_address: self.propertyAddress,
            price_wei: self.price,
            seller: self.seller,
            buyer: self.buyer,
            is_sold: self.isSold,
        }
    }
}
